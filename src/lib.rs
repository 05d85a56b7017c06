//! Touch Designer - projection engine for embedded touch-screen dashboards
//!
//! This library resolves a page of LVGL-style widgets into absolute canvas
//! positions, overlays live entity states through declarative links, and
//! computes arc gauge geometry, so a designer can preview exactly what the
//! device will show.
//!
//! # Example
//!
//! ```rust
//! use touch_designer::{render, Snapshot};
//!
//! let svg = render(r#"{"pages": [{"page_id": "main", "widgets": [
//!     {"id": "title", "type": "label", "x": 10, "y": 10, "w": 120, "h": 30}
//! ]}]}"#, &Snapshot::new()).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod arc;
pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod layout;
pub mod live;
pub mod projection;
pub mod renderer;
pub mod schema;

pub use arc::{ArcMode, ArcParams};
pub use binding::{resolve_overlay, BindingDraft, Link, Overlay, WidgetOverlay};
pub use config::{ConfigError, EngineConfig};
pub use document::{Document, Page};
pub use error::DocumentError;
pub use history::History;
pub use layout::{Anchor, LayoutConfig, LayoutError, Widget, WidgetTree};
pub use live::{EntityState, LiveFeed, Snapshot};
pub use projection::{project, Projection};
pub use renderer::{render_svg, PreviewConfig};
pub use schema::{SchemaError, SchemaRegistry};

use thiserror::Error;

/// Errors that can occur while projecting a document
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Error while loading the document
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Error in the widget hierarchy
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("page '{page_id}' not found")]
    UnknownPage { page_id: String },
}

impl ProjectError {
    pub fn unknown_page(page_id: impl Into<String>) -> Self {
        Self::UnknownPage {
            page_id: page_id.into(),
        }
    }
}

/// Configuration for the complete preview pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub engine: EngineConfig,
    pub preview: PreviewConfig,
    /// Page to render; the first page when unset
    pub page: Option<String>,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_preview(mut self, preview: PreviewConfig) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }
}

/// Project one page of a loaded document
pub fn project_document(
    doc: &Document,
    page_id: Option<&str>,
    snapshot: &Snapshot,
    config: &EngineConfig,
) -> Result<Projection, ProjectError> {
    let page = doc
        .page(page_id)
        .ok_or_else(|| ProjectError::unknown_page(page_id.unwrap_or_default()))?;
    project(page, &doc.links, snapshot, &config.layout)
}

/// Render a project document to an SVG preview with default configuration
pub fn render(source: &str, snapshot: &Snapshot) -> Result<String, ProjectError> {
    render_with_config(source, snapshot, RenderConfig::default())
}

/// Render a project document to an SVG preview with custom configuration
pub fn render_with_config(
    source: &str,
    snapshot: &Snapshot,
    config: RenderConfig,
) -> Result<String, ProjectError> {
    let doc = Document::from_json(source)?;
    let projection = project_document(&doc, config.page.as_deref(), snapshot, &config.engine)?;

    let mut preview = config.preview;
    if preview.palette.is_empty() {
        preview.palette = doc.palette.clone();
    }
    Ok(render_svg(&projection, &preview))
}
