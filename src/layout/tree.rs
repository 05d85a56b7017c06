//! Widget arena indexed by id
//!
//! Parent links are back-references by id. Integrity is enforced when edges
//! are created: `insert` and `reparent` refuse any edge that would close a
//! cycle or push a chain past the depth cap, so resolution never has to
//! detect loops at runtime.

use std::collections::{HashMap, HashSet};

use super::error::LayoutError;
use super::types::Widget;

/// Widgets of one page, in insertion order
#[derive(Debug, Clone)]
pub struct WidgetTree {
    widgets: HashMap<String, Widget>,
    order: Vec<String>,
    max_depth: usize,
}

impl WidgetTree {
    /// Create an empty tree with the given depth cap
    pub fn new(max_depth: usize) -> Self {
        Self {
            widgets: HashMap::new(),
            order: Vec::new(),
            max_depth,
        }
    }

    /// Build a tree from a page's widget list
    ///
    /// Widgets may appear before their parents. A parent reference to an id
    /// that is not on the page is dropped (the widget becomes top-level).
    /// Duplicate ids and broken chains are errors.
    pub fn from_widgets(
        widgets: impl IntoIterator<Item = Widget>,
        max_depth: usize,
    ) -> Result<Self, LayoutError> {
        let mut tree = Self::new(max_depth);
        for widget in widgets {
            if tree.widgets.contains_key(&widget.id) {
                return Err(LayoutError::duplicate(widget.id));
            }
            tree.order.push(widget.id.clone());
            tree.widgets.insert(widget.id.clone(), widget);
        }

        let orphans: Vec<String> = tree
            .widgets
            .values()
            .filter(|w| {
                w.parent
                    .as_ref()
                    .is_some_and(|p| !tree.widgets.contains_key(p))
            })
            .map(|w| w.id.clone())
            .collect();
        for id in orphans {
            if let Some(w) = tree.widgets.get_mut(&id) {
                tracing::warn!(widget = %id, parent = ?w.parent, "parent not on page, treating as top-level");
                w.parent = None;
            }
        }

        for id in &tree.order {
            tree.ancestry(id)?;
        }
        Ok(tree)
    }

    /// The configured depth cap
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    /// Iterate widgets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Widget> + '_ {
        self.order.iter().filter_map(|id| self.widgets.get(id))
    }

    /// Top-level widgets in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &Widget> + '_ {
        self.iter().filter(|w| w.parent.is_none())
    }

    /// Direct children of `id` in insertion order
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Widget> + 'a {
        self.iter().filter(move |w| w.parent.as_deref() == Some(id))
    }

    /// Add a widget; its parent (if any) must already be in the tree
    pub fn insert(&mut self, widget: Widget) -> Result<(), LayoutError> {
        if self.widgets.contains_key(&widget.id) {
            return Err(LayoutError::duplicate(widget.id));
        }
        if let Some(parent) = &widget.parent {
            if parent == &widget.id {
                return Err(LayoutError::hierarchy(
                    &widget.id,
                    vec![widget.id.clone(), widget.id.clone()],
                ));
            }
            if !self.widgets.contains_key(parent) {
                return Err(LayoutError::unknown(parent));
            }
            let mut chain = vec![widget.id.clone()];
            chain.extend(self.ancestry(parent)?);
            if chain.len() - 1 > self.max_depth {
                return Err(LayoutError::hierarchy(&widget.id, chain));
            }
        }
        self.order.push(widget.id.clone());
        self.widgets.insert(widget.id.clone(), widget);
        Ok(())
    }

    /// Move `id` under `new_parent` (or to the top level with `None`)
    ///
    /// Rejects the edge when `new_parent` is `id` itself or one of its
    /// descendants, or when the moved subtree would exceed the depth cap.
    pub fn reparent(&mut self, id: &str, new_parent: Option<&str>) -> Result<(), LayoutError> {
        if !self.widgets.contains_key(id) {
            return Err(LayoutError::unknown(id));
        }
        if let Some(parent) = new_parent {
            if !self.widgets.contains_key(parent) {
                return Err(LayoutError::unknown(parent));
            }
            let parent_chain = self.ancestry(parent)?;
            if parent_chain.iter().any(|a| a == id) {
                let mut chain = vec![id.to_string()];
                chain.extend(parent_chain.iter().take_while(|a| *a != id).cloned());
                chain.push(id.to_string());
                return Err(LayoutError::hierarchy(id, chain));
            }
            let depth_after = parent_chain.len() + self.subtree_height(id);
            if depth_after > self.max_depth {
                let mut chain = vec![id.to_string()];
                chain.extend(parent_chain);
                return Err(LayoutError::hierarchy(id, chain));
            }
        }
        if let Some(w) = self.widgets.get_mut(id) {
            w.parent = new_parent.map(str::to_string);
        }
        Ok(())
    }

    /// Replace a widget's record without changing its parent edge
    pub fn update(&mut self, widget: Widget) -> Result<(), LayoutError> {
        let slot = self
            .widgets
            .get_mut(&widget.id)
            .ok_or_else(|| LayoutError::unknown(&widget.id))?;
        let parent = slot.parent.clone();
        *slot = Widget { parent, ..widget };
        Ok(())
    }

    /// Chain from `id` up to its root, `id` first
    ///
    /// Walks at most `max_depth` hops and never revisits a widget.
    pub fn ancestry(&self, id: &str) -> Result<Vec<String>, LayoutError> {
        let mut widget = self.widgets.get(id).ok_or_else(|| LayoutError::unknown(id))?;
        let mut chain = vec![widget.id.clone()];
        let mut seen: HashSet<&str> = HashSet::from([widget.id.as_str()]);

        while let Some(parent) = widget.parent.as_deref() {
            let Some(next) = self.widgets.get(parent) else {
                break;
            };
            chain.push(next.id.clone());
            if !seen.insert(next.id.as_str()) || chain.len() - 1 > self.max_depth {
                return Err(LayoutError::hierarchy(id, chain));
            }
            widget = next;
        }
        Ok(chain)
    }

    /// Number of parent hops from `id` to its root
    pub fn depth(&self, id: &str) -> Result<usize, LayoutError> {
        Ok(self.ancestry(id)?.len() - 1)
    }

    /// Longest downward path below `id`, counted in hops
    fn subtree_height(&self, id: &str) -> usize {
        let mut height = 0;
        let mut frontier = vec![id.to_string()];
        while !frontier.is_empty() && height <= self.max_depth {
            let next: Vec<String> = frontier
                .iter()
                .flat_map(|p| self.children(p).map(|c| c.id.clone()).collect::<Vec<_>>())
                .collect();
            if next.is_empty() {
                break;
            }
            height += 1;
            frontier = next;
        }
        height
    }

    pub(crate) fn widget_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }
}
