use crate::error::{HistogramError, HistogramResult};
use crate::events::SelectionEvent;
use crate::render::Renderer;

use super::SelectionEngine;

impl<R: Renderer> SelectionEngine<R> {
    /// Routes a handle click: emits `HandleClick` and, when the edit flow is
    /// enabled, arms a pending edit for the host to resolve with text input.
    pub(super) fn on_handle_click(&mut self, handle_index: usize) {
        let Some(handle) = self.handles.get(handle_index) else {
            return;
        };
        let value = handle.value();

        if self.config.handle_edit {
            self.pending_edit = Some(handle_index);
        }
        self.emit(SelectionEvent::HandleClick {
            handle_index,
            value,
        });
    }

    /// Handle awaiting an edit value, armed by clicking it with `handle_edit`
    /// enabled.
    #[must_use]
    pub fn pending_handle_edit(&self) -> Option<usize> {
        self.pending_edit
    }

    /// Drops the pending edit without changing anything.
    pub fn abort_handle_edit(&mut self) {
        self.pending_edit = None;
    }

    /// Applies a host-provided value to the handle at `handle_index`.
    ///
    /// The input is parsed as a decimal number and rejected with
    /// [`HistogramError::PromptValue`] when it is not one. Accepted values
    /// are clamped to the histogram's range and then to the neighboring
    /// boundary values, so segments never reorder. Returns whether the
    /// selection actually changed.
    pub fn resolve_handle_edit(
        &mut self,
        handle_index: usize,
        input: &str,
    ) -> HistogramResult<bool> {
        if self.phase.is_dragging() {
            return Err(HistogramError::InvalidData(
                "handle edit cannot run during a drag".to_owned(),
            ));
        }
        if handle_index >= self.handles.len() {
            return Err(HistogramError::HandleOutOfRange {
                index: handle_index,
                handle_count: self.handles.len(),
            });
        }

        let trimmed = input.trim();
        let parsed: f64 = trimmed
            .parse()
            .map_err(|_| HistogramError::PromptValue(format!("`{trimmed}` is not a number")))?;
        if !parsed.is_finite() {
            return Err(HistogramError::PromptValue(format!(
                "`{trimmed}` is not a finite number"
            )));
        }

        if self.pending_edit == Some(handle_index) {
            self.pending_edit = None;
        }
        if self.phase.is_animating() {
            self.cancel_active_transition();
        }

        let Some(mapper) = self.mapper.clone() else {
            return Err(HistogramError::InvalidData(
                "handle edit requires a refreshed histogram".to_owned(),
            ));
        };
        let snapshot = self.selection_snapshot()?;

        // Drags can move a handle past its neighbors, so the edited boundary
        // is the handle's x rank, not its creation index.
        let boundary_index = self
            .handles_by_x()
            .iter()
            .position(|&index| index == handle_index)
            .unwrap_or(handle_index);

        {
            let Some(selection) = self.selection.as_mut() else {
                return Err(HistogramError::InvalidData(
                    "handle edit requires a refreshed histogram".to_owned(),
                ));
            };
            let points = selection.selection_points();
            let mut value = mapper.min_max().clamp(parsed);
            if let Some(previous) = boundary_index.checked_sub(1).and_then(|i| points.get(i)) {
                value = value.max(previous.value);
            }
            if let Some(next) = points.get(boundary_index + 1) {
                value = value.min(next.value);
            }
            selection.apply_boundary_edit(boundary_index, value, &mapper);
        }

        // TODO: update handles in place instead of rebuilding them
        self.rebuild_handles();
        self.repaint();

        let changed = self.selection_snapshot()? != snapshot;
        if changed {
            tracing::debug!(handle_index, "handle edit applied");
            let selection = self.output_selection().unwrap_or_default();
            self.emit(SelectionEvent::SelectionChanged { selection });
        }
        Ok(changed)
    }
}
