//! printf-style label templates using logos
//!
//! Only fixed-precision placeholders (`%.0f`, `%.1f`, `%.2f`, ...) are
//! substituted, and only the first one. Everything else, including other
//! `%` sequences, passes through verbatim.

use logos::Logos;

/// Template used when a link carries no format
pub const DEFAULT_FORMAT: &str = "%.0f";

/// Highest precision a placeholder may request
const MAX_PRECISION: usize = 20;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum FormatToken {
    #[regex(r"%\.[0-9]+f", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].parse::<usize>().ok().filter(|p| *p <= MAX_PRECISION)
    })]
    Fixed(usize),

    #[token("%")]
    Percent,

    #[regex(r"[^%]+")]
    Literal,
}

/// Substitute `value` into the first fixed-precision placeholder of `template`
pub fn substitute_first(template: &str, value: f64) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut done = false;
    for (token, span) in FormatToken::lexer(template).spanned() {
        match token {
            Ok(FormatToken::Fixed(precision)) if !done => {
                out.push_str(&to_fixed(value, precision));
                done = true;
            }
            _ => out.push_str(&template[span]),
        }
    }
    out
}

/// Fixed-point formatting with ties rounded away from zero
///
/// Rust's formatter rounds exact binary ties to even (`2.5` → `2`); the
/// firmware's printf and the designer's preview round them up.
pub fn to_fixed(value: f64, precision: usize) -> String {
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    if scaled.is_finite() && scaled.fract().abs() == 0.5 {
        return format!("{:.*}", precision, scaled.round() / factor);
    }
    format!("{:.*}", precision, value)
}

/// Round half toward positive infinity and print without a fraction
pub fn round_to_string(value: f64) -> String {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}
