//! Link (binding) records as stored in project documents

use serde::{Deserialize, Deserializer, Serialize};

/// What part of an entity a link reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The entity's state string
    #[default]
    State,
    /// `on` / anything else, as a boolean
    Binary,
    /// An attribute, as text
    AttributeText,
    /// An attribute, as a number
    AttributeNumber,
}

/// What a link does to its target widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAction {
    LabelText,
    LabelNumber,
    ArcValue,
    SliderValue,
    WidgetChecked,
    /// Hide the widget when the source is falsy
    ObjHidden,
}

impl TargetAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetAction::LabelText => "label_text",
            TargetAction::LabelNumber => "label_number",
            TargetAction::ArcValue => "arc_value",
            TargetAction::SliderValue => "slider_value",
            TargetAction::WidgetChecked => "widget_checked",
            TargetAction::ObjHidden => "obj_hidden",
        }
    }

    /// Whether the action only accepts numeric input
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TargetAction::LabelNumber | TargetAction::ArcValue | TargetAction::SliderValue
        )
    }
}

/// Entity side of a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSource {
    pub entity_id: String,
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl LinkSource {
    /// The attribute name, ignoring blank values
    pub fn attribute(&self) -> Option<&str> {
        self.attribute
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// The domain part of the entity id (`light` in `light.kitchen`)
    pub fn domain(&self) -> Option<&str> {
        entity_domain(&self.entity_id)
    }
}

/// Split off the domain of an entity id, if it has one
pub fn entity_domain(entity_id: &str) -> Option<&str> {
    entity_id
        .trim()
        .split_once('.')
        .map(|(domain, _)| domain)
        .filter(|d| !d.is_empty())
}

fn default_scale() -> f64 {
    1.0
}

/// Non-numeric or null scales fall back to 1
fn lenient_scale<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| v.as_f64())
        .filter(|s| s.is_finite())
        .unwrap_or(1.0))
}

/// Widget side of a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub widget_id: String,
    pub action: TargetAction,
    /// printf-style template; `%.Nf` placeholders receive the scaled number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default = "default_scale", deserialize_with = "lenient_scale")]
    pub scale: f64,
}

/// A declarative rule connecting one entity to one widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: LinkSource,
    pub target: LinkTarget,
}

impl Link {
    /// Build a link with default kind, format and scale
    pub fn new(entity_id: impl Into<String>, widget_id: impl Into<String>, action: TargetAction) -> Self {
        Self {
            source: LinkSource {
                entity_id: entity_id.into(),
                kind: SourceKind::State,
                attribute: None,
            },
            target: LinkTarget {
                widget_id: widget_id.into(),
                action,
                format: None,
                scale: 1.0,
            },
        }
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.source.kind = kind;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.source.attribute = Some(attribute.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.target.format = Some(format.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.target.scale = scale;
        self
    }

    /// A link needs a dotted entity id and a widget id to do anything
    pub fn is_well_formed(&self) -> bool {
        entity_domain(&self.source.entity_id).is_some() && !self.target.widget_id.trim().is_empty()
    }
}
