//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur while building or resolving a widget tree
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Reference to a widget id that is not in the tree
    #[error("unknown widget '{id}'")]
    UnknownWidget { id: String },

    /// Two widgets on the same page share an id
    #[error("duplicate widget id '{id}'")]
    DuplicateWidget { id: String },

    /// A parent chain loops back on itself or exceeds the depth cap
    #[error("cyclic or too deep widget hierarchy at '{widget}': {}", chain.join(" -> "))]
    CyclicOrTooDeepHierarchy { widget: String, chain: Vec<String> },

    /// A size that cannot be applied to a widget
    #[error("invalid size for widget '{id}': {width}x{height}")]
    InvalidSize { id: String, width: f64, height: f64 },
}

impl LayoutError {
    /// Create an unknown widget error
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownWidget { id: id.into() }
    }

    /// Create a duplicate id error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateWidget { id: id.into() }
    }

    /// Create a hierarchy integrity error
    pub fn hierarchy(widget: impl Into<String>, chain: Vec<String>) -> Self {
        Self::CyclicOrTooDeepHierarchy {
            widget: widget.into(),
            chain,
        }
    }

    /// Create an invalid size error
    pub fn invalid_size(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::InvalidSize {
            id: id.into(),
            width,
            height,
        }
    }

    /// The widget id the error is about
    pub fn widget_id(&self) -> &str {
        match self {
            Self::UnknownWidget { id } | Self::DuplicateWidget { id } | Self::InvalidSize { id, .. } => id,
            Self::CyclicOrTooDeepHierarchy { widget, .. } => widget,
        }
    }
}
