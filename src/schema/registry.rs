//! Widget schemas loaded from TOML

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::{PropMap, Widget};

use super::error::SchemaError;

/// Value type a schema field expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Bool,
    /// `#RRGGBB` text or a packed integer
    Color,
    /// One of the field's `options`
    Enum,
    List,
    #[default]
    Any,
}

/// One recognized property or style key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type", default)]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDef {
    /// Whether `value` has the shape this field expects
    pub fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            FieldType::Any => true,
            FieldType::String => value.is_string(),
            FieldType::Number => {
                value.is_number()
                    || value
                        .as_str()
                        .is_some_and(|s| s.trim().parse::<f64>().is_ok())
            }
            FieldType::Bool => value.is_boolean(),
            FieldType::Color => match value {
                Value::Number(n) => n.is_u64(),
                Value::String(s) => is_hex_color(s),
                _ => false,
            },
            FieldType::Enum => value
                .as_str()
                .is_some_and(|s| self.options.iter().any(|o| o.eq_ignore_ascii_case(s))),
            FieldType::List => value.is_array(),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or("");
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Default design size for new widgets of a type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultSize {
    pub w: f64,
    pub h: f64,
}

/// Everything the designer knows about one widget type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<DefaultSize>,
    #[serde(default)]
    pub props: BTreeMap<String, FieldDef>,
    #[serde(default)]
    pub style: BTreeMap<String, FieldDef>,
    #[serde(default)]
    pub events: BTreeMap<String, FieldDef>,
}

impl WidgetSchema {
    pub fn seed_props(&self) -> PropMap {
        seed(&self.props)
    }

    pub fn seed_style(&self) -> PropMap {
        seed(&self.style)
    }
}

fn seed(fields: &BTreeMap<String, FieldDef>) -> PropMap {
    fields
        .iter()
        .filter_map(|(k, f)| f.default.clone().map(|d| (k.clone(), d)))
        .collect()
}

/// How serious a schema finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Preserved but not interpreted
    Info,
    Warning,
}

/// A finding from validating a widget against its schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaIssue {
    pub level: IssueLevel,
    pub widget: String,
    /// `props`, `style`, or empty for whole-widget findings
    pub section: &'static str,
    pub key: Option<String>,
    pub message: String,
}

/// TOML shape: one table per widget type, keyed by type name
#[derive(Deserialize)]
struct TomlSchema {
    title: Option<String>,
    #[serde(default)]
    description: String,
    size: Option<DefaultSize>,
    #[serde(default)]
    props: BTreeMap<String, FieldDef>,
    #[serde(default)]
    style: BTreeMap<String, FieldDef>,
    #[serde(default)]
    events: BTreeMap<String, FieldDef>,
}

/// Built-in widget schemas
const BUILTIN_SCHEMAS: &str = r##"
[label]
title = "Label"
description = "Static or bound text"
size = { w = 120, h = 40 }

[label.props]
text = { type = "string", default = "Label" }
long_mode = { type = "enum", default = "WRAP", options = ["WRAP", "DOT", "SCROLL", "SCROLL_CIRCULAR", "CLIP"] }

[label.style]
text_color = { type = "color", default = "#E5E7EB" }
text_font = { type = "string" }
text_align = { type = "enum", default = "LEFT", options = ["LEFT", "CENTER", "RIGHT", "AUTO"] }
bg_color = { type = "color" }
bg_opa = { type = "number" }

[button]
title = "Button"
description = "Pressable button with an optional label"
size = { w = 120, h = 50 }

[button.props]
text = { type = "string", default = "Button" }
checkable = { type = "bool", default = false }

[button.style]
bg_color = { type = "color", default = "#111827" }
radius = { type = "number", default = 8 }
text_color = { type = "color", default = "#E5E7EB" }
border_width = { type = "number" }
border_color = { type = "color" }

[button.events]
on_press = { type = "string" }
on_release = { type = "string" }
on_click = { type = "string" }

[arc]
title = "Arc"
description = "Circular gauge or knob"
size = { w = 150, h = 150 }

[arc.props]
min_value = { type = "number", default = 0 }
max_value = { type = "number", default = 100 }
value = { type = "number", default = 0 }
rotation = { type = "number", default = 0 }
start_angle = { type = "number", default = 135 }
end_angle = { type = "number", default = 45 }
mode = { type = "enum", default = "NORMAL", options = ["NORMAL", "REVERSE", "SYMMETRICAL"] }
adjustable = { type = "bool", default = true }

[arc.style]
arc_color = { type = "color", default = "#374151" }
arc_width = { type = "number", default = 10 }
indicator_color = { type = "color", default = "#3B82F6" }

[arc.events]
on_value = { type = "string" }
on_release = { type = "string" }

[slider]
title = "Slider"
description = "Linear value control"
size = { w = 200, h = 20 }

[slider.props]
min_value = { type = "number", default = 0 }
max_value = { type = "number", default = 100 }
value = { type = "number", default = 0 }
mode = { type = "enum", default = "NORMAL", options = ["NORMAL", "REVERSE", "SYMMETRICAL", "RANGE"] }

[slider.style]
bg_color = { type = "color", default = "#374151" }
indicator_color = { type = "color", default = "#3B82F6" }
knob_color = { type = "color", default = "#E5E7EB" }

[slider.events]
on_value = { type = "string" }
on_release = { type = "string" }

[switch]
title = "Switch"
description = "On/off toggle"
size = { w = 60, h = 30 }

[switch.props]
checked = { type = "bool", default = false }

[switch.style]
bg_color = { type = "color", default = "#374151" }
indicator_color = { type = "color", default = "#22C55E" }

[switch.events]
on_value = { type = "string" }

[checkbox]
title = "Checkbox"
description = "Checkable box with text"
size = { w = 150, h = 30 }

[checkbox.props]
text = { type = "string", default = "Checkbox" }
checked = { type = "bool", default = false }

[checkbox.style]
text_color = { type = "color", default = "#E5E7EB" }

[checkbox.events]
on_value = { type = "string" }

[bar]
title = "Bar"
description = "Read-only progress bar"
size = { w = 200, h = 20 }

[bar.props]
min_value = { type = "number", default = 0 }
max_value = { type = "number", default = 100 }
value = { type = "number", default = 0 }

[bar.style]
bg_color = { type = "color", default = "#374151" }
indicator_color = { type = "color", default = "#3B82F6" }

[container]
title = "Container"
description = "Plain object that groups children"
size = { w = 200, h = 150 }

[container.props]
scrollable = { type = "bool", default = false }

[container.style]
bg_color = { type = "color", default = "#111827" }
bg_opa = { type = "number" }
radius = { type = "number", default = 0 }
border_width = { type = "number", default = 0 }
border_color = { type = "color" }
pad_all = { type = "number" }

[image]
title = "Image"
description = "Bitmap image"
size = { w = 100, h = 100 }

[image.props]
src = { type = "string" }
zoom = { type = "number" }

[dropdown]
title = "Dropdown"
description = "Selection list"
size = { w = 150, h = 40 }

[dropdown.props]
options = { type = "list", default = ["Option 1", "Option 2"] }
selected_index = { type = "number", default = 0 }

[dropdown.style]
bg_color = { type = "color", default = "#111827" }
text_color = { type = "color", default = "#E5E7EB" }

[dropdown.events]
on_value = { type = "string" }
"##;

/// Schemas by widget type
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, WidgetSchema>,
}

impl SchemaRegistry {
    /// Load schemas from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load schemas from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SchemaError> {
        let parsed: BTreeMap<String, TomlSchema> = toml::from_str(content)?;
        let schemas = parsed
            .into_iter()
            .map(|(kind, s)| {
                let schema = WidgetSchema {
                    title: s.title.unwrap_or_else(|| kind.clone()),
                    kind: kind.clone(),
                    description: s.description,
                    size: s.size,
                    props: s.props,
                    style: s.style,
                    events: s.events,
                };
                (kind, schema)
            })
            .collect();
        Ok(Self { schemas })
    }

    /// Add schemas from `other`, replacing same-named types
    pub fn extend(&mut self, other: SchemaRegistry) {
        self.schemas.extend(other.schemas);
    }

    pub fn lookup(&self, kind: &str) -> Option<&WidgetSchema> {
        self.schemas.get(kind)
    }

    /// Like `lookup`, but an error for unknown types
    pub fn require(&self, kind: &str) -> Result<&WidgetSchema, SchemaError> {
        self.lookup(kind)
            .ok_or_else(|| SchemaError::unknown_type(kind))
    }

    /// Registered type names, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Default props for a new widget of `kind`
    pub fn seed_props(&self, kind: &str) -> Result<PropMap, SchemaError> {
        self.require(kind).map(WidgetSchema::seed_props)
    }

    /// A new widget of `kind` at `(x, y)` with schema defaults filled in
    pub fn seed_widget(&self, id: impl Into<String>, kind: &str, x: f64, y: f64) -> Result<Widget, SchemaError> {
        let schema = self.require(kind)?;
        let size = schema.size.unwrap_or(DefaultSize { w: 100.0, h: 50.0 });
        let mut widget = Widget::new(id, kind, x, y, size.w, size.h);
        widget.props = schema.seed_props();
        widget.style = schema.seed_style();
        Ok(widget)
    }

    /// Check a widget's props and style against its schema
    ///
    /// Unknown keys are reported at `Info` level only; they stay on the
    /// widget untouched.
    pub fn validate(&self, widget: &Widget) -> Vec<SchemaIssue> {
        let Some(schema) = self.lookup(&widget.kind) else {
            return vec![SchemaIssue {
                level: IssueLevel::Warning,
                widget: widget.id.clone(),
                section: "",
                key: None,
                message: format!("no schema for widget type '{}'", widget.kind),
            }];
        };

        let mut issues = Vec::new();
        for (section, fields, values) in [
            ("props", &schema.props, &widget.props),
            ("style", &schema.style, &widget.style),
        ] {
            for (key, value) in values {
                let issue = match fields.get(key) {
                    None => Some((IssueLevel::Info, format!("'{key}' is not part of the {} schema", schema.kind))),
                    Some(_) if value.is_null() => None,
                    Some(def) if !def.accepts(value) => Some((
                        IssueLevel::Warning,
                        format!("'{key}' expects {:?}, got {value}", def.kind),
                    )),
                    Some(_) => None,
                };
                if let Some((level, message)) = issue {
                    issues.push(SchemaIssue {
                        level,
                        widget: widget.id.clone(),
                        section,
                        key: Some(key.clone()),
                        message,
                    });
                }
            }
        }
        issues
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::from_str(BUILTIN_SCHEMAS).expect("Built-in schemas should be valid TOML")
    }
}
