use crate::events::SelectionEvent;
use crate::interaction::{InteractionPhase, SelectionHandle};
use crate::render::Renderer;

use super::SelectionEngine;
use super::engine::DragSession;

impl<R: Renderer> SelectionEngine<R> {
    /// Starts a handle drag when the press lands in a handle's hit area.
    ///
    /// A press during an animated sweep cancels it and settles the handles
    /// first, so the grab happens against settled positions. While the drag
    /// runs every other handle is locked out.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() || self.drag.is_some() {
            return;
        }
        if !(0.0..=f64::from(self.config.viewport.height)).contains(&y) {
            return;
        }

        if self.phase.is_animating() {
            self.cancel_active_transition();
            self.snap_handles_to_selection();
            self.repaint();
        }

        let Some(handle_index) = self.handle_hit(x) else {
            return;
        };
        let start_snapshot = match self.selection_snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "drag aborted: selection snapshot failed");
                return;
            }
        };
        if self
            .handles
            .get_mut(handle_index)
            .and_then(SelectionHandle::begin_drag)
            .is_none()
        {
            return;
        }

        for (index, handle) in self.handles.iter_mut().enumerate() {
            if index != handle_index {
                handle.set_disabled(true);
            }
        }
        self.drag = Some(DragSession {
            handle_index,
            start_snapshot,
        });
        self.phase = InteractionPhase::Dragging;
        tracing::debug!(handle_index, "handle drag started");
    }

    /// Feeds the pointer column into the active drag.
    pub(super) fn drag_pointer_to(&mut self, x: f64) {
        let Some(session) = &self.drag else {
            return;
        };
        let handle_index = session.handle_index;
        let width = self.config.viewport.width;

        let Some(handle) = self.handles.get_mut(handle_index) else {
            return;
        };
        if handle.drag_to(x, width).is_some() {
            self.apply_handle_drag();
        }
    }

    /// Reflows the selection from the current handle positions after a drag
    /// movement.
    pub(super) fn apply_handle_drag(&mut self) {
        let mut positions: Vec<u32> = self
            .handles
            .iter()
            .map(SelectionHandle::x_position)
            .collect();
        positions.sort_unstable();

        {
            let (Some(mapper), Some(selection)) = (&self.mapper, &mut self.selection) else {
                return;
            };
            selection.update_from_boundary_positions(&positions, None, mapper);
        }
        self.sync_handle_values();
        self.repaint();
    }

    /// Ends the active drag, restores the other handles, and emits
    /// `SelectionChanged` when a boundary actually moved.
    pub fn pointer_up(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        if let Some(handle) = self.handles.get_mut(session.handle_index) {
            let _ = handle.end_drag();
        }
        for handle in &mut self.handles {
            handle.set_disabled(false);
        }
        self.phase = InteractionPhase::Rendered;
        self.emit_selection_changed_if_differs(&session.start_snapshot);
        tracing::debug!(handle_index = session.handle_index, "handle drag ended");
    }

    /// Serializes the current selection and emits `SelectionChanged` when it
    /// differs from `start_snapshot`.
    pub(super) fn emit_selection_changed_if_differs(&mut self, start_snapshot: &str) {
        let current = match self.selection_snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "selection snapshot failed; change event skipped");
                return;
            }
        };
        if current == start_snapshot {
            return;
        }

        let selection = self.output_selection().unwrap_or_default();
        self.emit(SelectionEvent::SelectionChanged { selection });
    }
}
