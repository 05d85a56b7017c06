//! Scratch state for building one link in the binding editor
//!
//! The editor owns a `BindingDraft` and hands it down to whatever picks the
//! domain, entity and action; nothing is stashed globally.

use thiserror::Error;

use super::types::{entity_domain, Link, LinkSource, LinkTarget, SourceKind, TargetAction};

/// Reasons a draft cannot become a link
#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("no entity selected")]
    MissingEntity,

    #[error("entity id '{0}' has no domain (expected e.g. 'light.kitchen')")]
    InvalidEntityId(String),

    #[error("no target widget")]
    MissingWidget,

    #[error("no action selected")]
    MissingAction,

    #[error("source kind '{0}' needs an attribute name")]
    MissingAttribute(&'static str),

    #[error("scale must be a finite number, got {0}")]
    InvalidScale(f64),
}

/// In-progress link being assembled by the binding editor
#[derive(Debug, Clone, PartialEq)]
pub struct BindingDraft {
    /// Domain filter for the entity picker (`light`, `sensor`, ...)
    pub domain: Option<String>,
    pub entity_id: Option<String>,
    pub kind: SourceKind,
    pub attribute: Option<String>,
    pub widget_id: Option<String>,
    pub action: Option<TargetAction>,
    pub format: Option<String>,
    pub scale: f64,
}

impl Default for BindingDraft {
    fn default() -> Self {
        Self {
            domain: None,
            entity_id: None,
            kind: SourceKind::State,
            attribute: None,
            widget_id: None,
            action: None,
            format: None,
            scale: 1.0,
        }
    }
}

impl BindingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a draft for a widget, preselecting its most likely action
    pub fn for_widget(widget_id: impl Into<String>, widget_type: &str) -> Self {
        Self {
            widget_id: Some(widget_id.into()),
            action: suggested_actions(widget_type).first().copied(),
            ..Self::default()
        }
    }

    /// Change the domain filter; drops an entity that no longer matches
    pub fn select_domain(&mut self, domain: impl Into<String>) {
        let domain = domain.into();
        let keep = self
            .entity_id
            .as_deref()
            .and_then(entity_domain)
            .is_some_and(|d| d == domain);
        if !keep {
            self.entity_id = None;
            self.attribute = None;
        }
        self.domain = Some(domain);
    }

    /// Pick an entity; the domain filter follows it
    pub fn select_entity(&mut self, entity_id: impl Into<String>) {
        let entity_id = entity_id.into();
        if let Some(domain) = entity_domain(&entity_id) {
            self.domain = Some(domain.to_string());
        }
        self.entity_id = Some(entity_id);
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_action(mut self, action: TargetAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Entity ids from `available` that match the current domain filter
    pub fn filter_entities<'a, I>(&self, available: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        available
            .into_iter()
            .filter(|id| match self.domain.as_deref() {
                Some(domain) => entity_domain(id) == Some(domain),
                None => entity_domain(id).is_some(),
            })
            .collect()
    }

    /// Validate the draft and produce the link
    pub fn build(&self) -> Result<Link, BindingError> {
        let entity_id = self
            .entity_id
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(BindingError::MissingEntity)?;
        if entity_domain(entity_id).is_none() {
            return Err(BindingError::InvalidEntityId(entity_id.to_string()));
        }
        let widget_id = self
            .widget_id
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .ok_or(BindingError::MissingWidget)?;
        let action = self.action.ok_or(BindingError::MissingAction)?;

        let attribute = self
            .attribute
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        match self.kind {
            SourceKind::AttributeText if attribute.is_none() => {
                return Err(BindingError::MissingAttribute("attribute_text"))
            }
            SourceKind::AttributeNumber if attribute.is_none() => {
                return Err(BindingError::MissingAttribute("attribute_number"))
            }
            _ => {}
        }
        if !self.scale.is_finite() {
            return Err(BindingError::InvalidScale(self.scale));
        }

        Ok(Link {
            source: LinkSource {
                entity_id: entity_id.to_string(),
                kind: self.kind,
                attribute,
            },
            target: LinkTarget {
                widget_id: widget_id.to_string(),
                action,
                format: self.format.clone().filter(|f| !f.is_empty()),
                scale: self.scale,
            },
        })
    }
}

/// Actions that make sense for a widget type, most likely first
pub fn suggested_actions(widget_type: &str) -> &'static [TargetAction] {
    match widget_type {
        "label" => &[TargetAction::LabelText, TargetAction::LabelNumber, TargetAction::ObjHidden],
        "arc" => &[TargetAction::ArcValue, TargetAction::ObjHidden],
        "slider" | "bar" => &[TargetAction::SliderValue, TargetAction::ObjHidden],
        "switch" | "checkbox" | "button" => &[TargetAction::WidgetChecked, TargetAction::ObjHidden],
        _ => &[TargetAction::ObjHidden],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_widget_preselects_action() {
        let draft = BindingDraft::for_widget("lbl", "label");
        assert_eq!(draft.action, Some(TargetAction::LabelText));
        assert_eq!(draft.scale, 1.0);

        let draft = BindingDraft::for_widget("box", "container");
        assert_eq!(draft.action, Some(TargetAction::ObjHidden));
    }

    #[test]
    fn test_build_link() {
        let mut draft = BindingDraft::for_widget("t", "label").with_format("%.1f °C");
        draft.select_entity("sensor.temp");
        assert_eq!(draft.domain.as_deref(), Some("sensor"));

        let link = draft.build().unwrap();
        assert_eq!(link.source.entity_id, "sensor.temp");
        assert_eq!(link.target.action, TargetAction::LabelText);
        assert_eq!(link.target.format.as_deref(), Some("%.1f °C"));
        assert!(link.is_well_formed());
    }

    #[test]
    fn test_build_errors() {
        let draft = BindingDraft::for_widget("t", "label");
        assert_eq!(draft.build(), Err(BindingError::MissingEntity));

        let mut draft = BindingDraft::for_widget("t", "label");
        draft.select_entity("nodomain");
        assert_eq!(
            draft.build(),
            Err(BindingError::InvalidEntityId("nodomain".into()))
        );

        let mut draft = BindingDraft::new().with_action(TargetAction::ArcValue);
        draft.select_entity("light.k");
        assert_eq!(draft.build(), Err(BindingError::MissingWidget));

        let mut draft = BindingDraft::for_widget("a", "arc").with_kind(SourceKind::AttributeNumber);
        draft.select_entity("light.k");
        assert_eq!(
            draft.build(),
            Err(BindingError::MissingAttribute("attribute_number"))
        );

        let mut draft = BindingDraft::for_widget("a", "arc").with_scale(f64::NAN);
        draft.select_entity("light.k");
        assert!(matches!(draft.build(), Err(BindingError::InvalidScale(_))));
    }

    #[test]
    fn test_domain_switch_clears_entity() {
        let mut draft = BindingDraft::for_widget("sw", "switch");
        draft.select_entity("light.k");
        draft.select_domain("light");
        assert_eq!(draft.entity_id.as_deref(), Some("light.k"));

        draft.select_domain("switch");
        assert_eq!(draft.entity_id, None);
        assert_eq!(draft.build(), Err(BindingError::MissingEntity));
    }

    #[test]
    fn test_filter_entities() {
        let mut draft = BindingDraft::new();
        let all = ["light.a", "sensor.b", "light.c", "broken"];
        assert_eq!(draft.filter_entities(all), vec!["light.a", "sensor.b", "light.c"]);

        draft.select_domain("light");
        assert_eq!(draft.filter_entities(all), vec!["light.a", "light.c"]);
    }

    #[test]
    fn test_suggested_actions() {
        assert_eq!(suggested_actions("arc")[0], TargetAction::ArcValue);
        assert_eq!(suggested_actions("checkbox")[0], TargetAction::WidgetChecked);
        assert_eq!(suggested_actions("unknown"), &[TargetAction::ObjHidden]);
    }
}
