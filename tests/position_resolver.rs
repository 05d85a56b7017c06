//! Integration tests for anchor-based position resolution

use pretty_assertions::assert_eq;
use touch_designer::layout::{
    resolve, resolve_all, resolve_bounds, Anchor, BoundingBox, LayoutConfig, LayoutError, Point,
    Widget, WidgetTree,
};

fn tree(widgets: Vec<Widget>) -> WidgetTree {
    WidgetTree::from_widgets(widgets, 10).expect("valid tree")
}

#[test]
fn test_root_top_left_is_identity() {
    let config = LayoutConfig::default();
    let widgets = vec![
        Widget::new("a", "label", 0.0, 0.0, 40.0, 20.0),
        Widget::new("b", "button", 12.5, 300.0, 80.0, 30.0),
        Widget::new("c", "container", -20.0, 7.0, 100.0, 100.0),
    ];
    let t = tree(widgets.clone());

    for w in &widgets {
        assert_eq!(resolve(&t, &w.id, &config).unwrap(), Point::new(w.x, w.y));
    }
}

#[test]
fn test_center_in_parent() {
    let config = LayoutConfig::default();
    let t = tree(vec![
        Widget::new("card", "container", 30.0, 40.0, 200.0, 120.0),
        Widget::new("dot", "label", 0.0, 0.0, 50.0, 20.0)
            .with_parent("card")
            .with_anchor(Anchor::Center),
    ]);

    // px + pw/2 - w/2, py + ph/2 - h/2
    assert_eq!(
        resolve(&t, "dot", &config).unwrap(),
        Point::new(30.0 + 100.0 - 25.0, 40.0 + 60.0 - 10.0)
    );
}

#[test]
fn test_edge_anchors_on_canvas() {
    let config = LayoutConfig::new().with_canvas(400.0, 200.0);
    let t = tree(vec![
        Widget::new("tm", "label", 0.0, 0.0, 40.0, 20.0).with_anchor(Anchor::TopMid),
        Widget::new("br", "label", -5.0, -5.0, 40.0, 20.0).with_anchor(Anchor::BottomRight),
        Widget::new("lm", "label", 10.0, 0.0, 40.0, 20.0).with_anchor(Anchor::LeftMid),
    ]);

    assert_eq!(resolve(&t, "tm", &config).unwrap(), Point::new(180.0, 0.0));
    assert_eq!(resolve(&t, "br", &config).unwrap(), Point::new(355.0, 175.0));
    assert_eq!(resolve(&t, "lm", &config).unwrap(), Point::new(10.0, 90.0));
}

#[test]
fn test_nested_offsets_accumulate() {
    let config = LayoutConfig::default();
    let t = tree(vec![
        Widget::new("outer", "container", 10.0, 10.0, 300.0, 200.0),
        Widget::new("inner", "container", 20.0, 30.0, 100.0, 100.0).with_parent("outer"),
        Widget::new("leaf", "label", 5.0, 5.0, 20.0, 10.0).with_parent("inner"),
    ]);

    assert_eq!(
        resolve_bounds(&t, "leaf", &config).unwrap(),
        BoundingBox::new(35.0, 45.0, 20.0, 10.0)
    );
}

#[test]
fn test_resize_scales_descendants() {
    let config = LayoutConfig::default();
    let t = tree(vec![
        Widget::new("panel", "container", 20.0, 20.0, 200.0, 100.0),
        Widget::new("row", "container", 10.0, 10.0, 80.0, 40.0).with_parent("panel"),
        Widget::new("leaf", "label", 5.0, 5.0, 20.0, 12.0).with_parent("row"),
        Widget::new("mid", "label", 0.0, 0.0, 60.0, 30.0)
            .with_parent("panel")
            .with_anchor(Anchor::Center),
    ]);
    let before = resolve_all(&t, &config).unwrap();

    let s = 2.0;
    let resized = t.resized("panel", 200.0 * s, 100.0 * s, config.min_widget_size).unwrap();
    let after = resolve_all(&resized, &config).unwrap();

    let origin = *after.get("panel").unwrap();
    assert_eq!(origin, BoundingBox::new(20.0, 20.0, 400.0, 200.0));
    for id in ["row", "leaf", "mid"] {
        let old = before.get(id).unwrap();
        let new = after.get(id).unwrap();
        assert_eq!(new.x - origin.x, (old.x - 20.0) * s, "x of {id}");
        assert_eq!(new.y - origin.y, (old.y - 20.0) * s, "y of {id}");
        assert_eq!(new.width, old.width * s, "width of {id}");
        assert_eq!(new.height, old.height * s, "height of {id}");
    }
}

#[test]
fn test_resize_returns_a_new_tree() {
    let t = tree(vec![
        Widget::new("panel", "container", 0.0, 0.0, 100.0, 100.0),
        Widget::new("child", "label", 50.0, 50.0, 40.0, 40.0).with_parent("panel"),
    ]);
    let shrunk = t.resized("panel", 10.0, 10.0, 10.0).unwrap();

    assert_eq!(t.get("child").unwrap().w, 40.0);
    let child = shrunk.get("child").unwrap();
    assert_eq!((child.x, child.y), (5.0, 5.0));
    // clamped at the minimum size
    assert_eq!((child.w, child.h), (10.0, 10.0));
}

#[test]
fn test_reparent_cycle_rejected() {
    let mut t = tree(vec![
        Widget::new("a", "container", 0.0, 0.0, 100.0, 100.0),
        Widget::new("b", "container", 0.0, 0.0, 50.0, 50.0).with_parent("a"),
        Widget::new("c", "label", 0.0, 0.0, 10.0, 10.0).with_parent("b"),
    ]);

    let err = t.reparent("a", Some("c")).unwrap_err();
    assert!(matches!(err, LayoutError::CyclicOrTooDeepHierarchy { .. }));
    assert_eq!(err.widget_id(), "a");
    // the tree is unchanged after a rejected edge
    assert_eq!(t.get("a").unwrap().parent, None);
}

#[test]
fn test_depth_cap_enforced() {
    let mut widgets = vec![Widget::new("w0", "container", 0.0, 0.0, 100.0, 100.0)];
    for i in 1..=11 {
        widgets.push(
            Widget::new(format!("w{i}"), "container", 1.0, 1.0, 100.0, 100.0)
                .with_parent(format!("w{}", i - 1)),
        );
    }

    let err = WidgetTree::from_widgets(widgets, 10).unwrap_err();
    assert!(matches!(err, LayoutError::CyclicOrTooDeepHierarchy { .. }));
}

#[test]
fn test_widgets_from_json() {
    let widgets: Vec<Widget> = serde_json::from_str(
        r#"[
            {"id": "box", "x": 10, "y": 10, "w": 100, "h": 60},
            {"id": "lbl", "type": "label", "parent_id": "box", "align": "BOTTOM_MID", "y": -4, "w": 40, "h": 12},
            {"id": "odd", "parent_id": "ghost", "align": "SIDEWAYS"}
        ]"#,
    )
    .unwrap();
    let t = tree(widgets);
    let config = LayoutConfig::default();

    assert_eq!(t.get("box").unwrap().kind, "container");
    assert_eq!(resolve(&t, "lbl", &config).unwrap(), Point::new(40.0, 54.0));
    // unknown parent and unknown anchor fall back to the canvas top-left
    assert_eq!(resolve(&t, "odd", &config).unwrap(), Point::new(0.0, 0.0));
}
