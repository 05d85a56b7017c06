//! Proportional resize cascade for containers
//!
//! When a container changes size, each direct child is rescaled by the same
//! factors on its offset and size. A rescaled child that has children of
//! its own is itself a resized container, so the cascade continues down the
//! subtree. The whole cascade is computed on a copy and returned as one new
//! tree; callers never observe an intermediate state.

use super::error::LayoutError;
use super::tree::WidgetTree;

impl WidgetTree {
    /// Return a copy of the tree with `id` resized to `new_w` x `new_h`
    ///
    /// Children get `x * sx`, `y * sy`, `max(min_size, w * sx)` and
    /// `max(min_size, h * sy)`, where `sx`/`sy` are the container's scale
    /// factors. A zero-sized container keeps its children's scale at 1 on
    /// that axis.
    pub fn resized(
        &self,
        id: &str,
        new_w: f64,
        new_h: f64,
        min_size: f64,
    ) -> Result<WidgetTree, LayoutError> {
        if !(new_w.is_finite() && new_h.is_finite()) || new_w <= 0.0 || new_h <= 0.0 {
            return Err(LayoutError::invalid_size(id, new_w, new_h));
        }
        let widget = self.get(id).ok_or_else(|| LayoutError::unknown(id))?;
        let (old_w, old_h) = (widget.w, widget.h);

        let mut next = self.clone();
        if let Some(w) = next.widget_mut(id) {
            w.w = new_w;
            w.h = new_h;
        }
        let sx = scale_factor(new_w, old_w);
        let sy = scale_factor(new_h, old_h);
        tracing::debug!(widget = %id, sx, sy, "resize cascade");

        let mut pending = vec![(id.to_string(), sx, sy)];
        while let Some((parent, sx, sy)) = pending.pop() {
            let children: Vec<String> = self.children(&parent).map(|c| c.id.clone()).collect();
            for child_id in children {
                let Some(child) = next.widget_mut(&child_id) else {
                    continue;
                };
                let (cw, ch) = (child.w, child.h);
                child.x *= sx;
                child.y *= sy;
                child.w = min_size.max(cw * sx);
                child.h = min_size.max(ch * sy);
                let csx = scale_factor(child.w, cw);
                let csy = scale_factor(child.h, ch);
                pending.push((child_id, csx, csy));
            }
        }
        Ok(next)
    }
}

fn scale_factor(new: f64, old: f64) -> f64 {
    if old == 0.0 {
        1.0
    } else {
        new / old
    }
}
