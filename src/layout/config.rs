//! Configuration for the layout engine

use super::types::BoundingBox;

/// Configuration options for position resolution
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Canvas width in pixels (the root content box)
    pub canvas_width: f64,

    /// Canvas height in pixels (the root content box)
    pub canvas_height: f64,

    /// Maximum number of parent hops from any widget to its root
    pub max_depth: usize,

    /// Smallest width/height a child may shrink to during a resize cascade
    pub min_widget_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 480.0,
            canvas_height: 320.0,
            max_depth: 10,
            min_widget_size: 10.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the maximum hierarchy depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the minimum widget size used by resize cascades
    pub fn with_min_widget_size(mut self, size: f64) -> Self {
        self.min_widget_size = size;
        self
    }

    /// The content box of top-level widgets
    pub fn canvas_box(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.canvas_width, self.canvas_height)
    }
}
