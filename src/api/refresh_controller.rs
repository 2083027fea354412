use crate::animation::TransitionToken;
use crate::core::{self, Bucket, CoordinateMapper, HistogramSelection, label_layout};
use crate::error::{HistogramError, HistogramResult};
use crate::interaction::{InteractionPhase, SelectionHandle};
use crate::render::Renderer;

use super::{RefreshOptions, SelectionEngine};

impl<R: Renderer> SelectionEngine<R> {
    /// Installs a freshly sampled histogram and selection.
    ///
    /// Buckets are subdivided into per-pixel samples at the configured
    /// viewport width. With `options.animate` and a boundary count matching
    /// the previous selection, handles sweep from where they are shown to
    /// their new positions and the returned token identifies that sweep.
    pub fn refresh(
        &mut self,
        buckets: &[Bucket],
        selection: HistogramSelection,
        options: RefreshOptions,
    ) -> HistogramResult<Option<TransitionToken>> {
        let mapper = CoordinateMapper::new(buckets, self.config.viewport.width)?;
        self.refresh_with_mapper(mapper, selection, options)
    }

    pub(super) fn refresh_with_mapper(
        &mut self,
        mapper: CoordinateMapper,
        mut selection: HistogramSelection,
        options: RefreshOptions,
    ) -> HistogramResult<Option<TransitionToken>> {
        self.cancel_active_transition();

        let animate_eligible = options.animate
            && self.mapper.is_some()
            && self
                .selection
                .as_ref()
                .is_some_and(|current| current.point_count() == selection.point_count());
        // Sweep sources are the positions currently shown, in boundary
        // order, so an interrupted sweep continues from where it was.
        let sources: Option<Vec<u32>> = animate_eligible.then(|| {
            let mut pixels: Vec<u32> = self
                .handles
                .iter()
                .map(SelectionHandle::x_position)
                .collect();
            pixels.sort_unstable();
            pixels
        });
        let previous_selection = if animate_eligible {
            self.selection.take()
        } else {
            None
        };

        selection.sync_positions(&mapper);
        tracing::debug!(
            samples = mapper.sample_count(),
            segments = selection.segment_count(),
            animate = options.animate,
            "refreshing histogram selection"
        );
        self.mapper = Some(mapper);
        self.selection = Some(selection);

        let segment_count = self
            .selection
            .as_ref()
            .map_or(0, HistogramSelection::segment_count);
        if self.hover_index.is_some_and(|index| index >= segment_count) {
            self.hover_index = None;
        }
        self.drag = None;
        self.pending_edit = None;
        self.rebuild_handles();
        self.update_handle_hover_states();

        if let (Some(sources), Some(previous)) = (sources, previous_selection)
            && let Some(token) = self.begin_transition(&sources, &previous)
        {
            return Ok(Some(token));
        }

        self.phase = InteractionPhase::Rendered;
        self.repaint();
        Ok(None)
    }

    /// Replaces the selection on the current histogram.
    ///
    /// Boundary changes take the full refresh path; style-only changes are
    /// adopted in place without events or a new layout.
    pub fn set_selection(
        &mut self,
        selection: HistogramSelection,
        options: RefreshOptions,
    ) -> HistogramResult<Option<TransitionToken>> {
        let Some(mapper) = &self.mapper else {
            return Err(HistogramError::InvalidData(
                "set_selection requires a refreshed histogram".to_owned(),
            ));
        };

        if core::needs_refresh(self.selection.as_ref(), &selection) {
            let mapper = mapper.clone();
            return self.refresh_with_mapper(mapper, selection, options);
        }

        // Same boundaries: adopt styles in place. An in-flight sweep keeps
        // running; its per-step restyling and the completion repaint pick the
        // new styles up.
        let mut selection = selection;
        selection.sync_positions(mapper);
        self.selection = Some(selection);
        self.sync_handle_hidden_flags();
        if self.phase.is_animating() {
            self.refresh_handle_primitives();
        } else {
            self.repaint();
        }
        Ok(None)
    }

    /// Rebuilds the handle set from the current boundary points.
    pub(super) fn rebuild_handles(&mut self) {
        let mut handles = Vec::new();
        if let (Some(mapper), Some(selection)) = (&self.mapper, &self.selection) {
            for (index, point) in selection.selection_points().iter().enumerate() {
                let mut handle = SelectionHandle::new(index, point.value, mapper);
                handle.set_hidden(point.hidden);
                handles.push(handle);
            }
        }
        self.handles = handles;
        self.handle_generation += 1;
    }

    /// Carries hidden flags from the boundary points onto the handles,
    /// matching boundaries to handles in x order.
    fn sync_handle_hidden_flags(&mut self) {
        let hidden: Vec<bool> = {
            let Some(selection) = &self.selection else {
                return;
            };
            selection
                .selection_points()
                .iter()
                .map(|point| point.hidden)
                .collect()
        };
        let order = self.handles_by_x();
        for (boundary, &handle_index) in order.iter().enumerate() {
            if let Some(&flag) = hidden.get(boundary) {
                self.handles[handle_index].set_hidden(flag);
            }
        }
    }

    /// Shows every handle's value label, pushing neighboring labels apart so
    /// they do not collide.
    pub fn show_selection_labels(&mut self) {
        for handle in &mut self.handles {
            handle.show_label();
        }
        if !self.phase.is_animating() {
            self.assign_label_offsets();
        }
        self.refresh_handle_primitives();
    }

    pub fn hide_selection_labels(&mut self) {
        for handle in &mut self.handles {
            handle.hide_label();
        }
        self.refresh_handle_primitives();
    }

    /// Recomputes label collision offsets for adjacent handle pairs, left to
    /// right. A handle squeezed from both sides keeps the offset of its
    /// right pair.
    pub(super) fn assign_label_offsets(&mut self) {
        let labels: Vec<String> = self
            .handles
            .iter()
            .map(|handle| self.format_value_label(handle.value()))
            .collect();
        let order = self.handles_by_x();

        let mut offsets: Vec<f64> = vec![0.0; self.handles.len()];
        for pair in order.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if self.handles[left].is_hidden() || self.handles[right].is_hidden() {
                continue;
            }
            let (left_offset, right_offset) = label_layout::handle_label_offsets(
                f64::from(self.handles[left].label_position()),
                f64::from(self.handles[right].label_position()),
                &labels[left],
                &labels[right],
                self.config.font_size_px,
                self.config.viewport.width,
            );
            offsets[left] = left_offset;
            offsets[right] = right_offset;
        }

        for (handle, offset) in self.handles.iter_mut().zip(offsets) {
            handle.set_label_offset(offset);
        }
    }
}
