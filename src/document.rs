//! Project documents as persisted by the project store
//!
//! Documents are read leniently: missing sections get the same defaults a
//! freshly created project has, and malformed widget or link entries are
//! dropped with a warning instead of failing the load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::binding::Link;
use crate::error::DocumentError;
use crate::layout::Widget;

/// Page created for projects that have none
pub const DEFAULT_PAGE_ID: &str = "main";
pub const DEFAULT_PAGE_NAME: &str = "Main";

/// Palette of a freshly created project
pub const DEFAULT_PALETTE: [(&str, &str); 4] = [
    ("color.bg", "#0B0F14"),
    ("color.card", "#111827"),
    ("color.text", "#E5E7EB"),
    ("color.muted", "#9CA3AF"),
];

/// One screen of widgets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub page_id: String,
    pub name: String,
    pub widgets: Vec<Widget>,
}

impl Page {
    pub fn new(page_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            name: name.into(),
            widgets: Vec::new(),
        }
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }
}

/// A loaded project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub model_version: u64,
    pub pages: Vec<Page>,
    pub links: Vec<Link>,
    pub palette: BTreeMap<String, String>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            model_version: 1,
            pages: vec![Page::new(DEFAULT_PAGE_ID, DEFAULT_PAGE_NAME)],
            links: Vec::new(),
            palette: default_palette(),
        }
    }
}

fn default_palette() -> BTreeMap<String, String> {
    DEFAULT_PALETTE
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Document {
    /// Load a project from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a project from JSON text
    ///
    /// Accepts either a bare project or a device record with the project
    /// under its `project` key.
    pub fn from_json(source: &str) -> Result<Self, DocumentError> {
        let mut root: Map<String, Value> =
            serde_json::from_str(source).map_err(DocumentError::from_json)?;
        if !root.contains_key("pages") {
            if let Some(Value::Object(project)) = root.remove("project") {
                root = project;
            }
        }
        Ok(Self::from_map(root))
    }

    fn from_map(mut root: Map<String, Value>) -> Self {
        let defaults = Self::default();

        let model_version = root
            .get("model_version")
            .and_then(Value::as_u64)
            .unwrap_or(defaults.model_version);

        let pages: Vec<Page> = match root.remove("pages") {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| read_page(i, v))
                .collect(),
            _ => Vec::new(),
        };
        let pages = if pages.is_empty() { defaults.pages } else { pages };

        let links = match root.remove("links") {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| read_link(i, v))
                .collect(),
            _ => Vec::new(),
        };

        let palette = match root.remove("palette") {
            Some(Value::Object(map)) => map
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
            _ => defaults.palette,
        };

        tracing::debug!(
            pages = pages.len(),
            links = links.len(),
            "loaded project document"
        );
        Self {
            model_version,
            pages,
            links,
            palette,
        }
    }

    /// The page with `page_id`, or the first page when `None`
    pub fn page(&self, page_id: Option<&str>) -> Option<&Page> {
        match page_id {
            Some(id) => self.pages.iter().find(|p| p.page_id == id),
            None => self.pages.first(),
        }
    }

    pub fn palette_color(&self, token: &str) -> Option<&str> {
        self.palette.get(token).map(String::as_str)
    }
}

fn read_page(index: usize, value: Value) -> Option<Page> {
    let Value::Object(mut map) = value else {
        tracing::warn!(index, "page entry is not an object, skipping");
        return None;
    };
    let page_id = match map.get("page_id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => format!("page_{}", index + 1),
    };
    let name = map
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| page_id.clone());
    let widgets = match map.remove("widgets") {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| read_widget(&page_id, i, v))
            .collect(),
        _ => Vec::new(),
    };
    Some(Page {
        page_id,
        name,
        widgets,
    })
}

/// Filter a raw widget entry; never fails the load
fn read_widget(page: &str, index: usize, value: Value) -> Option<Widget> {
    let has_id = value
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty());
    if !value.is_object() {
        tracing::warn!(page, index, "widget entry is not an object, skipping");
        return None;
    }
    if !has_id {
        tracing::warn!(page, index, "widget entry has no id, skipping");
        return None;
    }
    match serde_json::from_value::<Widget>(value) {
        Ok(widget) => Some(widget),
        Err(err) => {
            tracing::warn!(page, index, %err, "malformed widget entry, skipping");
            None
        }
    }
}

fn read_link(index: usize, value: Value) -> Option<Link> {
    if !value.is_object() {
        tracing::warn!(index, "link entry is not an object, skipping");
        return None;
    }
    match serde_json::from_value::<Link>(value) {
        Ok(link) => Some(link),
        Err(err) => {
            tracing::warn!(index, %err, "malformed link entry, skipping");
            None
        }
    }
}
