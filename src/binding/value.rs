//! Raw values pulled out of entity states

use serde_json::Value;

/// A value read from an entity, before any action is applied
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawValue {
    /// Convert an attribute value; `null` yields nothing
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(RawValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(RawValue::Number),
            Value::String(s) => Some(RawValue::Text(s.clone())),
            other => Some(RawValue::Text(other.to_string())),
        }
    }

    /// Numeric reading: numbers, or text that parses completely as one
    ///
    /// Booleans and blank text are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            RawValue::Text(s) => parse_number(s),
            RawValue::Bool(_) => None,
        }
    }

    /// Truthiness: non-empty text, non-zero numbers, `true`
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Text(s) => !s.is_empty(),
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RawValue::Bool(b) => *b,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.is_empty())
    }

    /// Plain string form, as a label would show it unformatted
    pub fn to_display(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => display_number(*n),
            RawValue::Bool(b) => b.to_string(),
        }
    }
}

/// Parse trimmed text as a finite number
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest decimal form, `0` for negative zero
pub fn display_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
