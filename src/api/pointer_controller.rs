use crate::core::HistogramSelection;
use crate::events::SelectionEvent;
use crate::render::Renderer;

use super::SelectionEngine;
use super::style_resolver;

impl<R: Renderer> SelectionEngine<R> {
    /// Routes pointer movement: feeds an active drag, otherwise hover.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.drag.is_some() {
            self.drag_pointer_to(x);
        } else {
            self.update_hover(x, y);
        }
    }

    /// Clears hover when the pointer leaves the widget.
    ///
    /// An active drag keeps its grab; the host keeps feeding `pointer_move`
    /// until the button is released.
    pub fn pointer_leave(&mut self) {
        if self.drag.is_some() {
            return;
        }
        self.set_hover(None);
    }

    fn update_hover(&mut self, x: f64, y: f64) {
        let inside = x.is_finite()
            && y.is_finite()
            && (0.0..=f64::from(self.config.viewport.width)).contains(&x)
            && (0.0..=f64::from(self.config.viewport.height)).contains(&y);
        let next = if inside { self.segment_hit(x) } else { None };
        self.set_hover(next);
    }

    /// Segment whose pixel range contains the pointer column, if any.
    pub(super) fn segment_hit(&self, x: f64) -> Option<usize> {
        let selection = self.selection.as_ref()?;
        if !x.is_finite() {
            return None;
        }
        let pixel = x.clamp(0.0, f64::from(self.config.viewport.width)).round() as u32;
        style_resolver::segment_index_at_pixel(selection, pixel)
    }

    pub(super) fn set_hover(&mut self, next: Option<usize>) {
        if next == self.hover_index {
            return;
        }
        self.hover_index = next;
        self.update_handle_hover_states();
        self.repaint();
        self.emit(SelectionEvent::SelectionOver {
            segment_index: next,
        });
    }

    /// Marks the two handles bounding the hovered segment as hovered.
    pub(super) fn update_handle_hover_states(&mut self) {
        for handle in &mut self.handles {
            handle.set_hover_state(false);
        }
        let Some(index) = self.hover_index else {
            return;
        };

        let order = self.handles_by_x();
        for boundary in [index, index + 1] {
            if let Some(&handle_index) = order.get(boundary) {
                self.handles[handle_index].set_hover_state(true);
            }
        }
        if !self.phase.is_animating() {
            self.assign_label_offsets();
        }
    }

    /// Handles a primary-button click at `(x, y)`.
    ///
    /// A handle hit beats a segment hit; segment clicks only toggle when the
    /// selection allows it. Clicks during a drag are swallowed, since the
    /// release that ends the drag is not a click.
    pub fn click(&mut self, x: f64, y: f64) {
        if self.phase.is_dragging() || !x.is_finite() || !y.is_finite() {
            return;
        }
        if !(0.0..=f64::from(self.config.viewport.height)).contains(&y) {
            return;
        }

        if let Some(handle_index) = self.handle_hit(x) {
            self.on_handle_click(handle_index);
            return;
        }
        if let Some(segment_index) = self.segment_hit(x)
            && self
                .selection
                .as_ref()
                .is_some_and(HistogramSelection::allows_toggle)
        {
            self.toggle_selection(segment_index);
        }
    }

    /// Handle whose hit area contains `x`. The closest one wins; on an exact
    /// tie the later handle does.
    pub(super) fn handle_hit(&self, x: f64) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }

        let mut best: Option<(f64, usize)> = None;
        for (index, handle) in self.handles.iter().enumerate() {
            if !handle.hit_test(x) {
                continue;
            }
            let distance = (x - f64::from(handle.x_position())).abs();
            if best.is_none_or(|(best_distance, _)| distance <= best_distance) {
                best = Some((distance, index));
            }
        }
        best.map(|(_, index)| index)
    }

    pub(super) fn toggle_selection(&mut self, segment_index: usize) {
        let enabled = {
            let Some(selection) = self.selection.as_mut() else {
                return;
            };
            let Some(segment) = selection.segments_mut().get_mut(segment_index) else {
                return;
            };
            segment.disabled = !segment.disabled;
            !segment.disabled
        };

        tracing::debug!(segment_index, enabled, "toggled selection segment");
        self.repaint();
        self.emit(SelectionEvent::ToggleSelection {
            segment_index,
            enabled,
        });
    }
}
