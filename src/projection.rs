//! Page projection: layout, bindings and arc geometry in one pass
//!
//! The projection is recomputed from scratch for every change to the page,
//! its links, or the live snapshot. Nothing is patched incrementally.

use serde::Serialize;

use crate::arc::{ArcBackground, ArcIndicator, ArcParams};
use crate::binding::{resolve_overlay, Link, WidgetOverlay};
use crate::document::Page;
use crate::layout::{resolve_all, BoundingBox, LayoutConfig, PropMap, WidgetTree};
use crate::live::Snapshot;
use crate::ProjectError;

/// Widget type that gets arc geometry
pub const ARC_WIDGET_TYPE: &str = "arc";

/// Arc parameters with the drawn segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcGeometry {
    pub params: ArcParams,
    pub background: ArcBackground,
    pub indicator: ArcIndicator,
}

impl ArcGeometry {
    pub fn from_params(params: ArcParams) -> Self {
        Self {
            background: params.background(),
            indicator: params.indicator(),
            params,
        }
    }
}

/// One widget as it would appear on the device right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedWidget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Absolute canvas bounds
    pub bounds: BoundingBox,
    /// False when the widget or an ancestor is hidden by a binding
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<WidgetOverlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arc: Option<ArcGeometry>,
    #[serde(skip_serializing_if = "PropMap::is_empty")]
    pub props: PropMap,
    #[serde(skip_serializing_if = "PropMap::is_empty")]
    pub style: PropMap,
}

impl ProjectedWidget {
    /// Text to display: the bound text, else the design-time `text` prop
    pub fn display_text(&self) -> Option<&str> {
        self.overlay
            .as_ref()
            .and_then(|o| o.text.as_deref())
            .or_else(|| self.props.get("text").and_then(|v| v.as_str()))
    }

    /// Bound value, else the design-time `value` prop
    pub fn display_value(&self) -> Option<f64> {
        self.overlay
            .as_ref()
            .and_then(|o| o.value)
            .or_else(|| crate::layout::prop_number(&self.props, "value"))
    }

    /// Bound checked state, else the design-time `checked` prop
    pub fn is_checked(&self) -> bool {
        self.overlay
            .as_ref()
            .and_then(|o| o.checked)
            .or_else(|| self.props.get("checked").and_then(|v| v.as_bool()))
            .unwrap_or(false)
    }
}

/// A fully resolved page, widgets in paint order (parents before children)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub page_id: String,
    pub canvas: BoundingBox,
    pub widgets: Vec<ProjectedWidget>,
}

impl Projection {
    pub fn get(&self, id: &str) -> Option<&ProjectedWidget> {
        self.widgets.iter().find(|w| w.id == id)
    }
}

/// Run layout, binding overlay and arc geometry for one page
pub fn project(
    page: &Page,
    links: &[Link],
    snapshot: &Snapshot,
    config: &LayoutConfig,
) -> Result<Projection, ProjectError> {
    let tree = WidgetTree::from_widgets(page.widgets.iter().cloned(), config.max_depth)?;
    let layout = resolve_all(&tree, config)?;
    let mut overlay = resolve_overlay(links, snapshot);

    let mut widgets = Vec::with_capacity(tree.len());
    // (id, parent visible)
    let mut stack: Vec<(String, bool)> = tree.roots().map(|w| (w.id.clone(), true)).collect();
    stack.reverse();
    while let Some((id, parent_visible)) = stack.pop() {
        let widget = tree.get(&id).ok_or_else(|| crate::layout::LayoutError::unknown(&id))?;
        let bounds = layout
            .get(&id)
            .copied()
            .ok_or_else(|| crate::layout::LayoutError::unknown(&id))?;
        let fields = overlay.remove(&id);
        let hidden = fields.as_ref().and_then(|f| f.hidden).unwrap_or(false);
        let visible = parent_visible && !hidden;

        let arc = (widget.kind == ARC_WIDGET_TYPE).then(|| {
            let params = ArcParams::from_props(&widget.props);
            let params = match fields.as_ref().and_then(|f| f.value) {
                Some(value) => params.with_value(value),
                None => params,
            };
            ArcGeometry::from_params(params)
        });

        let mut children: Vec<(String, bool)> = tree.children(&id).map(|c| (c.id.clone(), visible)).collect();
        children.reverse();
        stack.extend(children);

        widgets.push(ProjectedWidget {
            id: widget.id.clone(),
            kind: widget.kind.clone(),
            parent: widget.parent.clone(),
            bounds,
            visible,
            overlay: fields,
            arc,
            props: widget.props.clone(),
            style: widget.style.clone(),
        });
    }

    for id in overlay.keys() {
        tracing::debug!(widget = %id, "binding targets a widget not on this page");
    }
    tracing::debug!(page = %page.page_id, widgets = widgets.len(), "projected page");

    Ok(Projection {
        page_id: page.page_id.clone(),
        canvas: config.canvas_box(),
        widgets,
    })
}
