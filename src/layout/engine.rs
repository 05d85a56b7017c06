//! Position resolver
//!
//! Computes each widget's absolute top-left corner from parent-relative
//! offsets and its anchor, following the LVGL alignment rules the firmware
//! renderer applies.

use std::collections::HashMap;

use serde::Serialize;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::tree::WidgetTree;
use super::types::{Anchor, BoundingBox, Point, Widget};

/// Absolute bounds of every widget on a page
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedLayout {
    order: Vec<String>,
    bounds: HashMap<String, BoundingBox>,
}

impl ResolvedLayout {
    /// Absolute bounds of a widget
    pub fn get(&self, id: &str) -> Option<&BoundingBox> {
        self.bounds.get(id)
    }

    /// Bounds in page order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundingBox)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.bounds.get(id).map(|b| (id.as_str(), b)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Place a widget inside its parent's content box
///
/// `TOP_LEFT` is a plain offset from the parent's top-left. Every other
/// anchor offsets from the matching point of the parent box, then backs out
/// the widget's own top-left through its center.
pub fn place(widget: &Widget, parent: &BoundingBox) -> BoundingBox {
    if widget.anchor == Anchor::TopLeft {
        return BoundingBox::new(parent.x + widget.x, parent.y + widget.y, widget.w, widget.h);
    }

    let reference = parent.anchor_point(widget.anchor);
    let anchored = Point::new(reference.x + widget.x, reference.y + widget.y);
    let (fx, fy) = widget.anchor.fractions();
    let center = Point::new(
        anchored.x + (0.5 - fx) * widget.w,
        anchored.y + (0.5 - fy) * widget.h,
    );
    BoundingBox::new(
        center.x - widget.w / 2.0,
        center.y - widget.h / 2.0,
        widget.w,
        widget.h,
    )
}

/// Absolute top-left of a single widget
pub fn resolve(tree: &WidgetTree, id: &str, config: &LayoutConfig) -> Result<Point, LayoutError> {
    resolve_bounds(tree, id, config).map(|b| b.origin())
}

/// Absolute bounds of a single widget, walking its parent chain
pub fn resolve_bounds(
    tree: &WidgetTree,
    id: &str,
    config: &LayoutConfig,
) -> Result<BoundingBox, LayoutError> {
    let chain = tree.ancestry(id)?;
    let mut content = config.canvas_box();
    for link in chain.iter().rev() {
        let widget = tree.get(link).ok_or_else(|| LayoutError::unknown(link))?;
        content = place(widget, &content);
    }
    Ok(content)
}

/// Resolve every widget in the tree, reusing already-placed parents
pub fn resolve_all(tree: &WidgetTree, config: &LayoutConfig) -> Result<ResolvedLayout, LayoutError> {
    let mut layout = ResolvedLayout::default();
    let canvas = config.canvas_box();

    for widget in tree.iter() {
        if layout.bounds.contains_key(&widget.id) {
            continue;
        }
        // place any unresolved ancestors first, root-most first
        let chain = tree.ancestry(&widget.id)?;
        let start = chain
            .iter()
            .position(|id| layout.bounds.contains_key(id))
            .unwrap_or(chain.len());
        let mut content = chain
            .get(start)
            .and_then(|id| layout.bounds.get(id).copied())
            .unwrap_or(canvas);
        for id in chain[..start].iter().rev() {
            let w = tree.get(id).ok_or_else(|| LayoutError::unknown(id))?;
            content = place(w, &content);
            layout.bounds.insert(id.clone(), content);
        }
    }

    layout.order = tree.iter().map(|w| w.id.clone()).collect();
    tracing::debug!(widgets = layout.order.len(), "resolved page layout");
    Ok(layout)
}
