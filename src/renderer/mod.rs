//! SVG wireframe preview of a projected page
//!
//! A schematic view for debugging layouts and bindings: boxes, arc tracks
//! and bound text. It does not try to look like the device.

pub mod config;
pub mod svg;

pub use config::PreviewConfig;
pub use svg::render_svg;
