//! Integration tests for resolving links against a live snapshot

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use touch_designer::binding::{resolve_overlay, BindingDraft, Link, SourceKind, TargetAction};
use touch_designer::live::Snapshot;

fn snapshot(value: Value) -> Snapshot {
    serde_json::from_value(value).expect("valid snapshot")
}

fn links(value: Value) -> Vec<Link> {
    serde_json::from_value(value).expect("valid links")
}

fn resolve(links_json: Value, snapshot_json: Value) -> Value {
    let overlay = resolve_overlay(&links(links_json), &snapshot(snapshot_json));
    serde_json::to_value(overlay).unwrap()
}

#[test]
fn test_binary_switch() {
    let out = resolve(
        json!([{
            "source": {"entity_id": "light.k", "kind": "binary"},
            "target": {"widget_id": "sw1", "action": "widget_checked"}
        }]),
        json!({"light.k": {"state": "on", "attributes": {}}}),
    );
    assert_eq!(out, json!({"sw1": {"checked": true}}));
}

#[test]
fn test_binary_is_case_insensitive() {
    let out = resolve(
        json!([{
            "source": {"entity_id": "light.k", "kind": "binary"},
            "target": {"widget_id": "sw1", "action": "widget_checked"}
        }]),
        json!({"light.k": {"state": "ON"}}),
    );
    assert_eq!(out, json!({"sw1": {"checked": true}}));

    let off = resolve(
        json!([{
            "source": {"entity_id": "light.k", "kind": "binary"},
            "target": {"widget_id": "sw1", "action": "widget_checked"}
        }]),
        json!({"light.k": {"state": "unavailable"}}),
    );
    assert_eq!(off, json!({"sw1": {"checked": false}}));
}

#[test]
fn test_label_text_format_and_scale() {
    let snap = json!({"sensor.t": {"state": "21.4", "attributes": {}}});
    let link = |scale: f64| {
        json!([{
            "source": {"entity_id": "sensor.t"},
            "target": {"widget_id": "w", "action": "label_text", "format": "%.1f", "scale": scale}
        }])
    };

    assert_eq!(resolve(link(1.0), snap.clone()), json!({"w": {"text": "21.4"}}));
    assert_eq!(resolve(link(2.0), snap), json!({"w": {"text": "42.8"}}));
}

#[test]
fn test_format_keeps_surrounding_text() {
    let out = resolve(
        json!([{
            "source": {"entity_id": "sensor.t"},
            "target": {"widget_id": "w", "action": "label_text", "format": "Temp %.1f °C (%.0f)"}
        }]),
        json!({"sensor.t": {"state": "19.96"}}),
    );
    assert_eq!(out, json!({"w": {"text": "Temp 20.0 °C (%.0f)"}}));
}

#[test]
fn test_missing_entity_writes_nothing() {
    let out = resolve(
        json!([{
            "source": {"entity_id": "sensor.gone"},
            "target": {"widget_id": "w", "action": "label_text"}
        }]),
        json!({"sensor.t": {"state": "1"}}),
    );
    assert_eq!(out, json!({}));
}

#[test]
fn test_non_numeric_dropped_for_numeric_actions() {
    let out = resolve(
        json!([
            {"source": {"entity_id": "sensor.t"}, "target": {"widget_id": "gauge", "action": "arc_value"}},
            {"source": {"entity_id": "sensor.t"}, "target": {"widget_id": "num", "action": "label_number"}},
            {"source": {"entity_id": "sensor.t"}, "target": {"widget_id": "txt", "action": "label_text"}}
        ]),
        json!({"sensor.t": {"state": "unknown"}}),
    );
    assert_eq!(out, json!({"txt": {"text": "unknown"}}));
}

#[test]
fn test_attribute_number_falls_back_to_state() {
    let links_json = json!([{
        "source": {"entity_id": "climate.lr", "kind": "attribute_number", "attribute": "target_temp"},
        "target": {"widget_id": "dial", "action": "arc_value", "scale": 10}
    }]);

    let with_attr = resolve(
        links_json.clone(),
        json!({"climate.lr": {"state": "18", "attributes": {"target_temp": 21.5}}}),
    );
    assert_eq!(with_attr, json!({"dial": {"value": 215.0}}));

    let without_attr = resolve(
        links_json,
        json!({"climate.lr": {"state": "18", "attributes": {"target_temp": "n/a"}}}),
    );
    assert_eq!(without_attr, json!({"dial": {"value": 180.0}}));
}

#[test]
fn test_attribute_text_empty_uses_state() {
    let out = resolve(
        json!([{
            "source": {"entity_id": "media_player.tv", "kind": "attribute_text", "attribute": "media_title"},
            "target": {"widget_id": "title", "action": "label_text"}
        }]),
        json!({"media_player.tv": {"state": "idle", "attributes": {"media_title": ""}}}),
    );
    assert_eq!(out, json!({"title": {"text": "idle"}}));
}

#[test]
fn test_label_number_rounds() {
    let out = resolve(
        json!([{
            "source": {"entity_id": "sensor.h"},
            "target": {"widget_id": "hum", "action": "label_number", "scale": 0.5}
        }]),
        json!({"sensor.h": {"state": "87"}}),
    );
    assert_eq!(out, json!({"hum": {"text": "44"}}));
}

#[test]
fn test_last_link_wins_per_field() {
    let out = resolve(
        json!([
            {"source": {"entity_id": "sensor.a"}, "target": {"widget_id": "w", "action": "label_text"}},
            {"source": {"entity_id": "light.b", "kind": "binary"}, "target": {"widget_id": "w", "action": "widget_checked"}},
            {"source": {"entity_id": "sensor.c"}, "target": {"widget_id": "w", "action": "label_text"}}
        ]),
        json!({
            "sensor.a": {"state": "first"},
            "light.b": {"state": "on"},
            "sensor.c": {"state": "second"}
        }),
    );
    assert_eq!(out, json!({"w": {"text": "second", "checked": true}}));
}

#[test]
fn test_draft_builds_a_resolvable_link() {
    let mut draft = BindingDraft::for_widget("temp_label", "label").with_format("%.1f°");
    draft.select_domain("sensor");
    let picked = draft.filter_entities(["light.k", "sensor.t", "sensor.h", "bogus"]);
    assert_eq!(picked, vec!["sensor.t", "sensor.h"]);
    draft.select_entity(picked[0]);

    let link = draft.build().unwrap();
    assert_eq!(link.target.action, TargetAction::LabelText);
    assert_eq!(link.source.kind, SourceKind::State);

    let overlay = resolve_overlay(
        &[link],
        &snapshot(json!({"sensor.t": {"state": "22.25"}})),
    );
    assert_eq!(overlay["temp_label"].text.as_deref(), Some("22.3°"));
}
