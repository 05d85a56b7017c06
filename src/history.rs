//! Bounded undo/redo over document snapshots
//!
//! Two kinds of edits: previews (a drag in progress, a slider being moved)
//! replace the visible state without touching history, and commits push a
//! new undo step. Only commits can be undone.

/// Default number of undo steps kept
pub const DEFAULT_CAPACITY: usize = 50;

/// Snapshot history with an ephemeral preview slot
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Committed snapshots; `entries[index]` is the committed current state
    entries: Vec<T>,
    index: usize,
    /// Maximum undo steps
    capacity: usize,
    preview: Option<T>,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_CAPACITY)
    }

    /// History keeping at most `capacity` undo steps (at least one)
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            capacity: capacity.max(1),
            preview: None,
        }
    }

    /// What the user sees: the preview if one is active, else the committed state
    pub fn current(&self) -> &T {
        self.preview.as_ref().unwrap_or(&self.entries[self.index])
    }

    /// The committed state, ignoring any preview
    pub fn committed(&self) -> &T {
        &self.entries[self.index]
    }

    /// Show an in-progress edit; replaces any earlier preview
    pub fn preview(&mut self, state: T) {
        self.preview = Some(state);
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    /// Drop the preview and go back to the committed state
    pub fn cancel_preview(&mut self) -> Option<T> {
        self.preview.take()
    }

    /// Record a new undo step; clears the redo branch and any preview
    pub fn commit(&mut self, state: T) {
        self.preview = None;
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        if self.entries.len() > self.capacity + 1 {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
    }

    /// Commit the active preview; returns false if there is none
    pub fn commit_preview(&mut self) -> bool {
        match self.preview.take() {
            Some(state) => {
                self.commit(state);
                true
            }
            None => false,
        }
    }

    /// Step back one commit; an active preview is discarded first
    pub fn undo(&mut self) -> Option<&T> {
        self.preview = None;
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    pub fn redo(&mut self) -> Option<&T> {
        self.preview = None;
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.index
    }

    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.index - 1
    }

    /// Forget all steps, keeping the committed state
    pub fn clear(&mut self) {
        let current = self.entries.swap_remove(self.index);
        self.entries = vec![current];
        self.index = 0;
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_does_not_enter_history() {
        let mut h = History::new(0);
        h.preview(1);
        h.preview(2);
        assert_eq!(*h.current(), 2);
        assert_eq!(*h.committed(), 0);
        assert!(!h.can_undo());

        assert_eq!(h.cancel_preview(), Some(2));
        assert_eq!(*h.current(), 0);
    }

    #[test]
    fn test_commit_preview() {
        let mut h = History::new(0);
        h.preview(5);
        assert!(h.commit_preview());
        assert!(!h.commit_preview());
        assert_eq!(*h.current(), 5);
        assert_eq!(h.undo(), Some(&0));
    }

    #[test]
    fn test_undo_redo() {
        let mut h = History::new("a");
        h.commit("b");
        h.commit("c");
        assert_eq!(h.undo(), Some(&"b"));
        assert_eq!(h.undo(), Some(&"a"));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), Some(&"b"));
        assert_eq!(h.redo_depth(), 1);

        // a commit after undo discards the redo branch
        h.commit("d");
        assert!(!h.can_redo());
        assert_eq!(h.undo(), Some(&"b"));
    }

    #[test]
    fn test_undo_discards_preview() {
        let mut h = History::new(1);
        h.commit(2);
        h.preview(3);
        assert_eq!(h.undo(), Some(&1));
        assert!(!h.is_previewing());
    }

    #[test]
    fn test_capacity() {
        let mut h = History::with_capacity(0, 3);
        for i in 1..=10 {
            h.commit(i);
        }
        assert_eq!(h.undo_depth(), 3);
        while h.undo().is_some() {}
        assert_eq!(*h.current(), 7);
    }

    #[test]
    fn test_clear() {
        let mut h = History::new(1);
        h.commit(2);
        h.commit(3);
        h.undo();
        h.clear();
        assert_eq!(*h.current(), 2);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }
}
