use crate::animation::{SelectionTransition, TransitionProgress, TransitionStep, TransitionToken};
use crate::core::HistogramSelection;
use crate::interaction::InteractionPhase;
use crate::render::{Color, Renderer};

use super::SelectionEngine;
use super::frame_builder;
use super::style_resolver::{self, StyleContext};

impl<R: Renderer> SelectionEngine<R> {
    /// Plans and starts the sweep from `source_pixels` (boundary order) to
    /// the current boundary positions. Returns `None` when nothing moves.
    ///
    /// The first animated frame shows the new histogram bars styled with
    /// `previous_selection`'s pixel ranges; each step then restyles the
    /// column it passes, which wipes the new styling across the bars while
    /// the handles travel.
    pub(super) fn begin_transition(
        &mut self,
        source_pixels: &[u32],
        previous_selection: &HistogramSelection,
    ) -> Option<TransitionToken> {
        let width = self.config.viewport.width;
        let tracks: Vec<(u32, u32)> = {
            let mapper = self.mapper.as_ref()?;
            let selection = self.selection.as_ref()?;
            selection
                .selection_points()
                .iter()
                .zip(source_pixels)
                .map(|(point, &source)| (source, mapper.value_to_position(point.value)))
                .collect()
        };

        self.transition_generation += 1;
        let token = TransitionToken::new(self.transition_generation);
        let transition = SelectionTransition::plan(token, &tracks, width)?;

        // Park the handles at their sweep sources; the schedule walks them to
        // their targets pixel by pixel.
        for (handle, &(source, _)) in self.handles.iter_mut().zip(&tracks) {
            handle.set_x_position(source);
            handle.set_label_position(source);
        }

        let labels: Vec<String> = self
            .handles
            .iter()
            .map(|handle| self.format_value_label(handle.value()))
            .collect();
        let (frame, layout) = {
            let ctx = StyleContext {
                mapper: self.mapper.as_ref()?,
                selection: previous_selection,
                hover_index: self.hover_index,
                config: &self.config,
            };
            frame_builder::build_frame(&ctx, &self.handles, &labels)
        };
        self.frame = frame;
        self.layout = layout;

        tracing::debug!(
            generation = token.generation(),
            steps = transition.steps().len(),
            span_ms = transition.span_ms(),
            "selection transition started"
        );
        self.transition = Some(transition);
        self.phase = InteractionPhase::Animating;
        Some(token)
    }

    /// Advances the active sweep by host frame time.
    ///
    /// Call this from the host's tick callback with the wall-clock seconds
    /// since the previous call; steps that have come due are applied to the
    /// retained frame.
    pub fn advance_animation(&mut self, delta_seconds: f64) -> TransitionProgress {
        let Some(mut transition) = self.transition.take() else {
            return TransitionProgress::Idle;
        };

        let due = transition.advance(delta_seconds * 1000.0);
        let applied = due.len();
        for step_index in due {
            let step = transition.steps()[step_index];
            self.apply_transition_step(step);
        }

        if transition.is_complete() {
            tracing::debug!(
                generation = transition.token().generation(),
                "selection transition completed"
            );
            self.phase = InteractionPhase::Rendered;
            self.repaint();
            return TransitionProgress::Completed;
        }

        let remaining = transition.remaining();
        self.transition = Some(transition);
        TransitionProgress::Running { applied, remaining }
    }

    fn apply_transition_step(&mut self, step: TransitionStep) {
        if let Some(handle) = self.handles.get_mut(step.point_index) {
            handle.set_x_position(step.pixel);
            handle.set_label_position(step.pixel);
        }
        self.repaint_bar_at(step.pixel);
        self.refresh_handle_primitives();
    }

    /// Restyles the frame's bar column at `pixel` in place, against the
    /// current selection.
    pub(super) fn repaint_bar_at(&mut self, pixel: u32) {
        let updates: Vec<(usize, Color)> = {
            let (Some(mapper), Some(selection)) = (&self.mapper, &self.selection) else {
                return;
            };
            let ctx = StyleContext {
                mapper,
                selection,
                hover_index: self.hover_index,
                config: &self.config,
            };
            let opacity = style_resolver::resolve_bar_opacity(&ctx, pixel);

            let mut updates = Vec::new();
            for sample_index in mapper.bar_indices_at_pixel(pixel) {
                let (Some(&start), Some(&end)) = (
                    self.layout.bar_rect_offsets.get(sample_index),
                    self.layout.bar_rect_offsets.get(sample_index + 1),
                ) else {
                    continue;
                };
                for (volume_index, rect_index) in (start..end).enumerate() {
                    let color = style_resolver::resolve_bar_color(&ctx, pixel, volume_index)
                        .with_opacity(opacity);
                    updates.push((rect_index, color));
                }
            }
            updates
        };

        for (rect_index, color) in updates {
            if let Some(rect) = self.frame.rects.get_mut(rect_index) {
                rect.fill_color = color;
            }
        }
    }

    /// Cancels the sweep identified by `token`; stale tokens are a no-op.
    ///
    /// On cancellation the handles snap to their target positions and the
    /// frame is rebuilt in its final styling.
    pub fn cancel_transition(&mut self, token: TransitionToken) -> bool {
        let matches = self
            .transition
            .as_ref()
            .is_some_and(|transition| transition.token() == token);
        if !matches {
            return false;
        }

        if let Some(transition) = self.transition.take() {
            tracing::debug!(
                generation = transition.token().generation(),
                remaining = transition.remaining(),
                "selection transition cancelled"
            );
        }
        self.phase = InteractionPhase::Rendered;
        self.snap_handles_to_selection();
        self.repaint();
        true
    }

    /// Drops any in-flight sweep before state that supersedes it lands.
    pub(super) fn cancel_active_transition(&mut self) {
        if let Some(transition) = self.transition.take() {
            tracing::debug!(
                generation = transition.token().generation(),
                remaining = transition.remaining(),
                "superseding in-flight selection transition"
            );
        }
        if self.phase.is_animating() {
            self.phase = InteractionPhase::Rendered;
        }
    }

    /// The in-flight sweep, if any.
    #[must_use]
    pub fn active_transition(&self) -> Option<&SelectionTransition> {
        self.transition.as_ref()
    }
}
