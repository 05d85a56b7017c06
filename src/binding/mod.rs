//! Binding overlay: links from live entities to widget display fields

mod draft;
mod format;
mod overlay;
mod types;
mod value;

pub use draft::{suggested_actions, BindingDraft, BindingError};
pub use format::{round_to_string, substitute_first, to_fixed, FormatToken, DEFAULT_FORMAT};
pub use overlay::{apply_action, raw_value, resolve_overlay, Overlay, WidgetOverlay};
pub use types::{entity_domain, Link, LinkSource, LinkTarget, SourceKind, TargetAction};
pub use value::{parse_number, RawValue};

/// Dotted entity ids referenced by well-formed links, in first-seen order
pub fn bound_entity_ids(links: &[Link]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for link in links.iter().filter(|l| l.is_well_formed()) {
        let id = link.source.entity_id.trim();
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
