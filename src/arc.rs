//! Arc geometry for circular gauges
//!
//! Angles follow the LVGL convention: degrees, 0° points right, 90° points
//! down, and angles grow clockwise. `rotation` shifts the whole arc; it is
//! applied identically to the drawn background, the indicator, and the
//! pointer-to-value mapping.
//!
//! The background is always swept clockwise from `start_angle` to
//! `end_angle`. There is no shortest-path interpretation: `start = 270,
//! end = 0` is a 90° arc, `start = 90, end = 0` is a 270° arc.

use serde::{Deserialize, Serialize};

use crate::layout::{prop_number, Point, PropMap};

/// How the indicator grows with the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArcMode {
    /// From the start angle, clockwise
    #[default]
    Normal,
    /// From the end angle, counter-clockwise
    Reverse,
    /// From the midpoint, clockwise toward the end
    Symmetrical,
}

impl ArcMode {
    /// Parse a mode name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Some(Self::Normal),
            "REVERSE" => Some(Self::Reverse),
            "SYMMETRICAL" => Some(Self::Symmetrical),
            _ => None,
        }
    }
}

/// Normalize an angle to `[0, 360)`
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Clockwise extent from `start_angle` to `end_angle`; a zero sweep is a full circle
pub fn sweep_cw(start_angle: f64, end_angle: f64) -> f64 {
    let sweep = normalize_degrees(end_angle - start_angle);
    if sweep == 0.0 {
        360.0
    } else {
        sweep
    }
}

/// Placement of the background track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcBackground {
    /// Clockwise extent in degrees, in `(0, 360]`
    pub sweep_cw: f64,
    /// Absolute start angle in `[0, 360)`
    pub start_deg: f64,
    /// Absolute end angle in `[0, 360)`
    pub end_deg: f64,
}

/// Placement of the value indicator
///
/// `from_deg`/`to_deg` are absolute and normalized. `sweep` is signed:
/// positive when drawn clockwise, negative when drawn counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcIndicator {
    pub from_deg: f64,
    pub to_deg: f64,
    pub sweep: f64,
    pub clockwise: bool,
    /// Fraction of the value range the indicator represents
    pub ratio: f64,
}

/// Compute where the background track is drawn
pub fn compute_arc_background(rotation: f64, start_angle: f64, end_angle: f64) -> ArcBackground {
    let sweep = sweep_cw(start_angle, end_angle);
    ArcBackground {
        sweep_cw: sweep,
        start_deg: normalize_degrees(rotation + start_angle),
        end_deg: normalize_degrees(rotation + start_angle + sweep),
    }
}

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`
///
/// A degenerate range (or a non-finite result) maps to the midpoint.
pub fn value_ratio(min: f64, max: f64, value: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    let t = (value - min) / (max - min);
    if t.is_finite() {
        t.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Compute the indicator segment for `value`
pub fn compute_arc_indicator(
    rotation: f64,
    start_angle: f64,
    end_angle: f64,
    mode: ArcMode,
    min: f64,
    max: f64,
    value: f64,
) -> ArcIndicator {
    let sweep = sweep_cw(start_angle, end_angle);
    let t = value_ratio(min, max, value);
    let start = rotation + start_angle;

    let (from, signed) = match mode {
        ArcMode::Normal => (start, t * sweep),
        ArcMode::Reverse => (start + sweep, -(t * sweep)),
        ArcMode::Symmetrical => (start + sweep / 2.0, t * sweep / 2.0),
    };

    ArcIndicator {
        from_deg: normalize_degrees(from),
        to_deg: normalize_degrees(from + signed),
        sweep: signed,
        clockwise: mode != ArcMode::Reverse,
        ratio: t,
    }
}

/// Map a pointer angle back to a value (drag simulation)
///
/// The pointer's clockwise distance from the logical start is divided by
/// the sweep and clamped to `[0, 1]`. Symmetrical arcs measure from the
/// midpoint over the half sweep, mirroring the one-sided indicator.
pub fn pointer_angle_to_value(
    rotation: f64,
    start_angle: f64,
    end_angle: f64,
    mode: ArcMode,
    min: f64,
    max: f64,
    pointer_angle_deg: f64,
) -> f64 {
    let pointer = normalize_degrees(pointer_angle_deg);
    let sweep = sweep_cw(start_angle, end_angle);
    let start_world = normalize_degrees(rotation + start_angle);
    let norm = (normalize_degrees(pointer - start_world) / sweep).clamp(0.0, 1.0);

    match mode {
        ArcMode::Normal => min + norm * (max - min),
        ArcMode::Reverse => min + (1.0 - norm) * (max - min),
        ArcMode::Symmetrical => {
            let half = sweep / 2.0;
            let mid_world = normalize_degrees(start_world + half);
            let norm = (normalize_degrees(pointer - mid_world) / half).clamp(0.0, 1.0);
            min + norm * (max - min)
        }
    }
}

/// LVGL angle of `point` as seen from `center`
pub fn pointer_angle(center: Point, point: Point) -> f64 {
    let dy = point.y - center.y;
    let dx = point.x - center.x;
    normalize_degrees(dy.atan2(dx).to_degrees())
}

/// Arc widget parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcParams {
    pub rotation: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mode: ArcMode,
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl Default for ArcParams {
    /// LVGL's arc defaults: a 270° track opening at the bottom
    fn default() -> Self {
        Self {
            rotation: 0.0,
            start_angle: 135.0,
            end_angle: 45.0,
            mode: ArcMode::Normal,
            min: 0.0,
            max: 100.0,
            value: 0.0,
        }
    }
}

impl ArcParams {
    /// Read arc parameters from widget props, keeping defaults for missing keys
    pub fn from_props(props: &PropMap) -> Self {
        let d = Self::default();
        let mode = props
            .get("mode")
            .and_then(|v| v.as_str())
            .and_then(ArcMode::parse)
            .unwrap_or(d.mode);
        Self {
            rotation: prop_number(props, "rotation").unwrap_or(d.rotation),
            start_angle: prop_number(props, "start_angle").unwrap_or(d.start_angle),
            end_angle: prop_number(props, "end_angle").unwrap_or(d.end_angle),
            mode,
            min: prop_number(props, "min_value").unwrap_or(d.min),
            max: prop_number(props, "max_value").unwrap_or(d.max),
            value: prop_number(props, "value").unwrap_or(d.value),
        }
    }

    /// Same parameters with a different value
    pub fn with_value(self, value: f64) -> Self {
        Self { value, ..self }
    }

    pub fn background(&self) -> ArcBackground {
        compute_arc_background(self.rotation, self.start_angle, self.end_angle)
    }

    pub fn indicator(&self) -> ArcIndicator {
        compute_arc_indicator(
            self.rotation,
            self.start_angle,
            self.end_angle,
            self.mode,
            self.min,
            self.max,
            self.value,
        )
    }

    /// Value a drag to `pointer_angle_deg` would set
    pub fn value_at(&self, pointer_angle_deg: f64) -> f64 {
        pointer_angle_to_value(
            self.rotation,
            self.start_angle,
            self.end_angle,
            self.mode,
            self.min,
            self.max,
            pointer_angle_deg,
        )
    }
}
