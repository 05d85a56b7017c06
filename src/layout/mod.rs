//! Layout engine: widget arena and absolute position resolution
//!
//! This module takes a page's widgets with parent-relative offsets and
//! anchors and computes where each one lands on the canvas.

pub mod config;
pub mod engine;
pub mod error;
pub mod resize;
pub mod tree;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{place, resolve, resolve_all, resolve_bounds, ResolvedLayout};
pub use error::LayoutError;
pub use tree::WidgetTree;
pub use types::*;
