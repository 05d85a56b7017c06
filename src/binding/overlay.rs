//! Binding overlay resolver
//!
//! Merges the page's links with the live snapshot into per-widget display
//! overrides. Resolution never fails: a missing entity, a missing attribute
//! or a value of the wrong type simply produces no override for that field.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::live::{EntityState, Snapshot};

use super::format::{round_to_string, substitute_first, DEFAULT_FORMAT};
use super::types::{Link, LinkSource, LinkTarget, SourceKind, TargetAction};
use super::value::{parse_number, RawValue};

/// Display fields a link can override on one widget
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WidgetOverlay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl WidgetOverlay {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.value.is_none() && self.checked.is_none() && self.hidden.is_none()
    }

    /// Shallow merge: every field set on `other` replaces ours
    pub fn merge(&mut self, other: WidgetOverlay) {
        if other.text.is_some() {
            self.text = other.text;
        }
        if other.value.is_some() {
            self.value = other.value;
        }
        if other.checked.is_some() {
            self.checked = other.checked;
        }
        if other.hidden.is_some() {
            self.hidden = other.hidden;
        }
    }
}

/// Overrides keyed by widget id
pub type Overlay = BTreeMap<String, WidgetOverlay>;

/// Read the value a link's source points at
pub fn raw_value(source: &LinkSource, entity: &EntityState) -> Option<RawValue> {
    match (source.kind, source.attribute()) {
        (SourceKind::Binary, _) => Some(RawValue::Bool(entity.state.to_lowercase() == "on")),
        (SourceKind::AttributeNumber, Some(attr)) => entity
            .attributes
            .get(attr)
            .and_then(RawValue::from_json)
            .and_then(|v| v.as_number())
            .or_else(|| parse_number(&entity.state))
            .map(RawValue::Number),
        (SourceKind::AttributeText, Some(attr)) => entity
            .attributes
            .get(attr)
            .and_then(RawValue::from_json)
            .filter(|v| !v.is_empty())
            .or_else(|| Some(RawValue::Text(entity.state.clone()))),
        _ => Some(RawValue::Text(entity.state.clone())),
    }
}

/// Turn a raw value into the fields the target action sets
pub fn apply_action(target: &LinkTarget, raw: &RawValue) -> WidgetOverlay {
    let scaled = || raw.as_number().map(|n| n * target.scale);
    let mut out = WidgetOverlay::default();
    match target.action {
        TargetAction::LabelText => {
            out.text = Some(match scaled() {
                Some(n) => substitute_first(target.format.as_deref().unwrap_or(DEFAULT_FORMAT), n),
                None => raw.to_display(),
            });
        }
        TargetAction::LabelNumber => out.text = scaled().map(round_to_string),
        TargetAction::ArcValue | TargetAction::SliderValue => out.value = scaled(),
        TargetAction::WidgetChecked => out.checked = Some(raw.is_truthy()),
        TargetAction::ObjHidden => out.hidden = Some(!raw.is_truthy()),
    }
    out
}

/// Resolve every link against the snapshot, in list order
///
/// When several links write the same field of the same widget, the one
/// later in the list wins.
pub fn resolve_overlay(links: &[Link], snapshot: &Snapshot) -> Overlay {
    let mut overlay = Overlay::new();
    for link in links {
        if !link.is_well_formed() {
            tracing::debug!(entity = %link.source.entity_id, widget = %link.target.widget_id, "skipping malformed link");
            continue;
        }
        let Some(entity) = snapshot.get(link.source.entity_id.trim()) else {
            continue;
        };
        let Some(raw) = raw_value(&link.source, entity) else {
            continue;
        };
        let fields = apply_action(&link.target, &raw);
        if fields.is_empty() {
            tracing::trace!(
                widget = %link.target.widget_id,
                action = link.target.action.as_str(),
                "value not usable for action"
            );
            continue;
        }
        overlay
            .entry(link.target.widget_id.clone())
            .or_default()
            .merge(fields);
    }
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot(entries: &[(&str, &str, serde_json::Value)]) -> Snapshot {
        let mut snap = Snapshot::new();
        for (id, state, attrs) in entries {
            snap.apply_state(*id, EntityState::from_json(*state, attrs.clone()));
        }
        snap
    }

    #[test]
    fn test_binary_checked() {
        let snap = snapshot(&[("light.k", "on", json!({}))]);
        let links = vec![Link::new("light.k", "sw1", TargetAction::WidgetChecked).with_kind(SourceKind::Binary)];
        let overlay = resolve_overlay(&links, &snap);
        assert_eq!(
            overlay.get("sw1"),
            Some(&WidgetOverlay {
                checked: Some(true),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_binary_is_case_insensitive() {
        let snap = snapshot(&[("light.k", "ON", json!({}))]);
        let links = vec![Link::new("light.k", "sw1", TargetAction::WidgetChecked).with_kind(SourceKind::Binary)];
        assert_eq!(resolve_overlay(&links, &snap)["sw1"].checked, Some(true));

        let snap = snapshot(&[("light.k", "off", json!({}))]);
        assert_eq!(resolve_overlay(&links, &snap)["sw1"].checked, Some(false));
    }

    #[test]
    fn test_label_text_formats_numbers() {
        let snap = snapshot(&[("sensor.t", "21.4", json!({}))]);
        let link = Link::new("sensor.t", "w", TargetAction::LabelText).with_format("%.1f");
        let overlay = resolve_overlay(&[link.clone()], &snap);
        assert_eq!(overlay["w"].text.as_deref(), Some("21.4"));

        let overlay = resolve_overlay(&[link.with_scale(2.0)], &snap);
        assert_eq!(overlay["w"].text.as_deref(), Some("42.8"));
    }

    #[test]
    fn test_label_text_defaults_to_integer_format() {
        let snap = snapshot(&[("sensor.t", "21.6", json!({}))]);
        let overlay = resolve_overlay(&[Link::new("sensor.t", "w", TargetAction::LabelText)], &snap);
        assert_eq!(overlay["w"].text.as_deref(), Some("22"));
    }

    #[test]
    fn test_label_text_passes_text_through() {
        let snap = snapshot(&[("weather.home", "sunny", json!({}))]);
        let link = Link::new("weather.home", "w", TargetAction::LabelText).with_format("%.1f");
        assert_eq!(resolve_overlay(&[link], &snap)["w"].text.as_deref(), Some("sunny"));
    }

    #[test]
    fn test_missing_entity_writes_nothing() {
        let snap = snapshot(&[("sensor.other", "1", json!({}))]);
        let overlay = resolve_overlay(&[Link::new("sensor.t", "w", TargetAction::LabelText)], &snap);
        assert!(!overlay.contains_key("w"));
    }

    #[test]
    fn test_attribute_number_with_fallback() {
        let snap = snapshot(&[
            ("light.k", "on", json!({"brightness": 128})),
            ("climate.x", "19.5", json!({"hvac": "heat"})),
        ]);
        let links = vec![
            Link::new("light.k", "a1", TargetAction::ArcValue)
                .with_kind(SourceKind::AttributeNumber)
                .with_attribute("brightness")
                .with_scale(0.5),
            Link::new("climate.x", "a2", TargetAction::ArcValue)
                .with_kind(SourceKind::AttributeNumber)
                .with_attribute("hvac"),
        ];
        let overlay = resolve_overlay(&links, &snap);
        assert_eq!(overlay["a1"].value, Some(64.0));
        assert_eq!(overlay["a2"].value, Some(19.5));
    }

    #[test]
    fn test_attribute_text_falls_back_to_state_when_empty() {
        let snap = snapshot(&[("media_player.tv", "playing", json!({"media_title": ""}))]);
        let link = Link::new("media_player.tv", "t", TargetAction::LabelText)
            .with_kind(SourceKind::AttributeText)
            .with_attribute("media_title");
        assert_eq!(resolve_overlay(&[link], &snap)["t"].text.as_deref(), Some("playing"));
    }

    #[test]
    fn test_attribute_text_numeric_attribute_is_formatted() {
        let snap = snapshot(&[("sensor.x", "ok", json!({"temp": 7.25}))]);
        let link = Link::new("sensor.x", "t", TargetAction::LabelText)
            .with_kind(SourceKind::AttributeText)
            .with_attribute("temp")
            .with_format("%.1f C");
        assert_eq!(resolve_overlay(&[link], &snap)["t"].text.as_deref(), Some("7.3 C"));
    }

    #[test]
    fn test_numeric_actions_drop_non_numeric() {
        let snap = snapshot(&[("sensor.t", "unavailable", json!({}))]);
        let links = vec![
            Link::new("sensor.t", "arc", TargetAction::ArcValue),
            Link::new("sensor.t", "num", TargetAction::LabelNumber),
        ];
        let overlay = resolve_overlay(&links, &snap);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_label_number_rounds() {
        let snap = snapshot(&[("sensor.t", "21.5", json!({}))]);
        let link = Link::new("sensor.t", "n", TargetAction::LabelNumber).with_scale(1.0);
        assert_eq!(resolve_overlay(&[link], &snap)["n"].text.as_deref(), Some("22"));
    }

    #[test]
    fn test_last_link_wins_per_field() {
        let snap = snapshot(&[("sensor.a", "1", json!({})), ("sensor.b", "2", json!({}))]);
        let links = vec![
            Link::new("sensor.a", "w", TargetAction::SliderValue),
            Link::new("sensor.a", "w", TargetAction::WidgetChecked),
            Link::new("sensor.b", "w", TargetAction::SliderValue),
        ];
        let overlay = resolve_overlay(&links, &snap);
        assert_eq!(
            overlay["w"],
            WidgetOverlay {
                value: Some(2.0),
                checked: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_obj_hidden() {
        let snap = snapshot(&[("binary_sensor.door", "off", json!({}))]);
        let link = Link::new("binary_sensor.door", "warn", TargetAction::ObjHidden).with_kind(SourceKind::Binary);
        assert_eq!(resolve_overlay(&[link], &snap)["warn"].hidden, Some(true));
    }

    #[test]
    fn test_malformed_links_skipped() {
        let snap = snapshot(&[("nodot", "1", json!({}))]);
        let overlay = resolve_overlay(&[Link::new("nodot", "w", TargetAction::SliderValue)], &snap);
        assert!(overlay.is_empty());
    }
}
