//! Widgets, anchors and canvas geometry

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Open key-value map used for widget `props` and `style`
///
/// Values are type-erased JSON; the schema registry decides which keys a
/// widget type recognizes. Unknown keys are carried through untouched.
pub type PropMap = BTreeMap<String, serde_json::Value>;

/// Read a numeric prop, accepting JSON numbers and numeric strings
pub fn prop_number(props: &PropMap, key: &str) -> Option<f64> {
    match props.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// A 2D point in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Absolute on-canvas extent of a widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center(&self) -> Point {
        self.anchor_point(Anchor::Center)
    }

    /// The point on this box that `anchor` refers to
    pub fn anchor_point(&self, anchor: Anchor) -> Point {
        let (fx, fy) = anchor.fractions();
        Point::new(self.x + self.width * fx, self.y + self.height * fy)
    }
}

/// 9-point alignment reference, mirroring the LVGL `align` values
///
/// `TopLeft` is plain parent-relative placement. Every other anchor
/// positions the widget relative to the matching point of its parent's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopMid,
    TopRight,
    LeftMid,
    Center,
    RightMid,
    BottomLeft,
    BottomMid,
    BottomRight,
}

impl Anchor {
    /// All anchors in row-major order
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopMid,
        Anchor::TopRight,
        Anchor::LeftMid,
        Anchor::Center,
        Anchor::RightMid,
        Anchor::BottomLeft,
        Anchor::BottomMid,
        Anchor::BottomRight,
    ];

    /// Horizontal and vertical position of the anchor as a fraction of a box
    pub fn fractions(self) -> (f64, f64) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopMid => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::LeftMid => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::RightMid => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomMid => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }

    /// The canonical name as used in project documents
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "TOP_LEFT",
            Anchor::TopMid => "TOP_MID",
            Anchor::TopRight => "TOP_RIGHT",
            Anchor::LeftMid => "LEFT_MID",
            Anchor::Center => "CENTER",
            Anchor::RightMid => "RIGHT_MID",
            Anchor::BottomLeft => "BOTTOM_LEFT",
            Anchor::BottomMid => "BOTTOM_MID",
            Anchor::BottomRight => "BOTTOM_RIGHT",
        }
    }

    /// Parse an anchor name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(name))
    }
}

/// Accept missing, null, or unrecognized anchors as `TOP_LEFT`
fn lenient_anchor<'de, D>(deserializer: D) -> Result<Anchor, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        Some(name) => Anchor::parse(&name).unwrap_or_else(|| {
            tracing::warn!(anchor = %name, "unknown anchor, using TOP_LEFT");
            Anchor::TopLeft
        }),
        None => Anchor::TopLeft,
    })
}

fn default_widget_type() -> String {
    "container".to_string()
}

fn default_width() -> f64 {
    100.0
}

fn default_height() -> f64 {
    50.0
}

/// A widget as stored on a page
///
/// `x`/`y` are parent-relative; how they are interpreted depends on `anchor`.
/// `parent` is a back-reference by id, the tree owns nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type", default = "default_widget_type")]
    pub kind: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_width")]
    pub w: f64,
    #[serde(default = "default_height")]
    pub h: f64,
    #[serde(default, alias = "parent_id", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, alias = "align", deserialize_with = "lenient_anchor")]
    pub anchor: Anchor,
    #[serde(default, skip_serializing_if = "PropMap::is_empty")]
    pub props: PropMap,
    #[serde(default, skip_serializing_if = "PropMap::is_empty")]
    pub style: PropMap,
}

impl Widget {
    /// Create a top-level widget with the given geometry
    pub fn new(id: impl Into<String>, kind: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x,
            y,
            w,
            h,
            parent: None,
            anchor: Anchor::TopLeft,
            props: PropMap::new(),
            style: PropMap::new(),
        }
    }

    /// Set the parent widget id
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the alignment anchor
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set a single prop value
    pub fn with_prop(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }
}
