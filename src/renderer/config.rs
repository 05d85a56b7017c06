//! Options for the SVG wireframe preview

use std::collections::BTreeMap;

/// How the wireframe preview is drawn
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Space around the canvas in the viewBox
    pub margin: f64,

    /// Emit the `<?xml ...?>` declaration (off when embedding in HTML)
    pub xml_declaration: bool,

    /// One element per line, indented by group nesting
    pub indent: bool,

    /// Prepended to every CSS class (`td-` gives `td-widget`)
    pub class_prefix: String,

    /// Draw widgets hidden by a binding, dimmed
    pub show_hidden: bool,

    /// Label every widget with its id
    pub show_ids: bool,

    /// Project palette emitted as CSS custom properties
    pub palette: BTreeMap<String, String>,

    /// Track width for arcs without an `arc_width` style
    pub default_arc_width: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            xml_declaration: true,
            indent: true,
            class_prefix: "td-".to_string(),
            show_hidden: false,
            show_ids: false,
            palette: BTreeMap::new(),
            default_arc_width: 10.0,
        }
    }
}

impl PreviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_xml_declaration(mut self, enabled: bool) -> Self {
        self.xml_declaration = enabled;
        self
    }

    pub fn with_indent(mut self, enabled: bool) -> Self {
        self.indent = enabled;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Debug view: hidden widgets and widget ids are drawn
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.show_hidden = debug;
        self.show_ids = debug;
        self
    }

    pub fn with_palette(mut self, palette: BTreeMap<String, String>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_default_arc_width(mut self, width: f64) -> Self {
        self.default_arc_width = width;
        self
    }
}
