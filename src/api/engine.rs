use std::fmt;

use indexmap::IndexMap;

use crate::animation::SelectionTransition;
use crate::core::{CoordinateMapper, HistogramSelection, SegmentSpec, Viewport};
use crate::error::{HistogramError, HistogramResult};
use crate::events::SelectionObserver;
use crate::interaction::{InteractionPhase, SelectionHandle};
use crate::render::{RenderFrame, Renderer};

use super::frame_builder::{self, FrameLayout};
use super::style_resolver::StyleContext;
use super::{SelectionEngineConfig, ValueLabelFormatterFn};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// An in-flight handle drag: the grabbed handle plus the selection snapshot
/// taken when the gesture started.
pub(super) struct DragSession {
    pub(super) handle_index: usize,
    pub(super) start_snapshot: String,
}

/// Main orchestration facade consumed by host applications.
///
/// `SelectionEngine` owns the sampled histogram, the live selection, the
/// boundary handles, and the retained frame handed to the renderer. Hosts
/// feed it pointer input and host time; it feeds back events and frames.
pub struct SelectionEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: SelectionEngineConfig,
    pub(super) label_formatter: Option<ValueLabelFormatterFn>,
    pub(super) observers: IndexMap<String, Box<dyn SelectionObserver>>,
    pub(super) mapper: Option<CoordinateMapper>,
    pub(super) selection: Option<HistogramSelection>,
    pub(super) handles: Vec<SelectionHandle>,
    pub(super) handle_generation: u64,
    pub(super) phase: InteractionPhase,
    pub(super) hover_index: Option<usize>,
    pub(super) rendered: bool,
    pub(super) drag: Option<DragSession>,
    pub(super) pending_edit: Option<usize>,
    pub(super) transition: Option<SelectionTransition>,
    pub(super) transition_generation: u64,
    pub(super) frame: RenderFrame,
    pub(super) layout: FrameLayout,
}

impl<R: Renderer> fmt::Debug for SelectionEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("config", &self.config)
            .field("mapper", &self.mapper)
            .field("selection", &self.selection)
            .field("handles", &self.handles)
            .field("handle_generation", &self.handle_generation)
            .field("phase", &self.phase)
            .field("hover_index", &self.hover_index)
            .field("rendered", &self.rendered)
            .field("pending_edit", &self.pending_edit)
            .field("transition", &self.transition)
            .field("transition_generation", &self.transition_generation)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> SelectionEngine<R> {
    pub fn new(renderer: R, config: SelectionEngineConfig) -> HistogramResult<Self> {
        config.validate()?;
        let frame = RenderFrame::new(config.viewport);

        Ok(Self {
            renderer,
            config,
            label_formatter: None,
            observers: IndexMap::new(),
            mapper: None,
            selection: None,
            handles: Vec::new(),
            handle_generation: 0,
            phase: InteractionPhase::Idle,
            hover_index: None,
            rendered: false,
            drag: None,
            pending_edit: None,
            transition: None,
            transition_generation: 0,
            frame,
            layout: FrameLayout::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SelectionEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[must_use]
    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Sampled histogram of the last `refresh`, if any.
    #[must_use]
    pub fn mapper(&self) -> Option<&CoordinateMapper> {
        self.mapper.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&HistogramSelection> {
        self.selection.as_ref()
    }

    /// Host-facing snapshot of the current selection.
    #[must_use]
    pub fn output_selection(&self) -> Option<Vec<SegmentSpec>> {
        self.selection
            .as_ref()
            .map(HistogramSelection::output_selection)
    }

    #[must_use]
    pub fn handles(&self) -> &[SelectionHandle] {
        &self.handles
    }

    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Bumped every time the handle set is rebuilt; cheap selection updates
    /// leave it unchanged.
    #[must_use]
    pub fn handle_generation(&self) -> u64 {
        self.handle_generation
    }

    #[must_use]
    pub fn hovered_segment_index(&self) -> Option<usize> {
        self.hover_index
    }

    /// Retained frame from the last layout pass.
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Replaces the handle label formatter. `None` restores the default
    /// two-decimal formatting.
    pub fn set_value_label_formatter(&mut self, formatter: Option<ValueLabelFormatterFn>) {
        self.label_formatter = formatter;
        self.refresh_handle_primitives();
    }

    pub(super) fn format_value_label(&self, value: f64) -> String {
        if let Some(formatter) = &self.label_formatter {
            return formatter(value);
        }

        let text = format!("{value:.2}");
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_owned()
        } else {
            trimmed.to_owned()
        }
    }

    pub fn render(&mut self) -> HistogramResult<()> {
        self.renderer.render(&self.frame)?;
        self.rendered = true;
        Ok(())
    }

    /// Renders the frame into an external cairo context.
    ///
    /// This path is used by host draw callbacks while keeping the renderer
    /// implementation decoupled from any specific windowing toolkit.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> HistogramResult<()>
    where
        R: CairoContextRenderer,
    {
        self.renderer.render_on_cairo_context(context, &self.frame)?;
        self.rendered = true;
        Ok(())
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Rebuilds the whole retained frame from current state.
    pub(super) fn repaint(&mut self) {
        let labels: Vec<String> = self
            .handles
            .iter()
            .map(|handle| self.format_value_label(handle.value()))
            .collect();

        let (frame, layout) = match (&self.mapper, &self.selection) {
            (Some(mapper), Some(selection)) => {
                let ctx = StyleContext {
                    mapper,
                    selection,
                    hover_index: self.hover_index,
                    config: &self.config,
                };
                frame_builder::build_frame(&ctx, &self.handles, &labels)
            }
            _ => (RenderFrame::new(self.config.viewport), FrameLayout::default()),
        };

        self.frame = frame;
        self.layout = layout;
    }

    /// Rebuilds only the handle lines and labels, leaving bars untouched.
    pub(super) fn refresh_handle_primitives(&mut self) {
        let labels: Vec<String> = self
            .handles
            .iter()
            .map(|handle| self.format_value_label(handle.value()))
            .collect();
        let lines = frame_builder::handle_lines(&self.handles, &self.config);
        let texts = frame_builder::handle_labels(&self.handles, &labels, &self.config);
        self.frame.lines = lines;
        self.frame.texts = texts;
    }

    /// Serialized output selection; the dirty-check currency for
    /// `SelectionChanged`.
    pub(super) fn selection_snapshot(&self) -> HistogramResult<String> {
        let output = self
            .selection
            .as_ref()
            .map(HistogramSelection::output_selection)
            .unwrap_or_default();
        serde_json::to_string(&output)
            .map_err(|e| HistogramError::InvalidData(format!("failed to serialize selection: {e}")))
    }

    /// Handle indices sorted by horizontal position; segment `i` sits between
    /// the `i`-th and `i + 1`-th entries.
    pub(super) fn handles_by_x(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.handles.len()).collect();
        order.sort_by_key(|&index| self.handles[index].x_position());
        order
    }

    /// Re-syncs handle values from the boundary values in x order.
    pub(super) fn sync_handle_values(&mut self) {
        let Some(selection) = &self.selection else {
            return;
        };
        let points = selection.selection_points();
        let order = self.handles_by_x();
        for (boundary, &handle_index) in order.iter().enumerate() {
            if let Some(point) = points.get(boundary) {
                self.handles[handle_index].set_value(point.value);
            }
        }
    }

    /// Moves every handle back onto its boundary's mapped pixel.
    pub(super) fn snap_handles_to_selection(&mut self) {
        let positions: Vec<u32> = {
            let (Some(mapper), Some(selection)) = (&self.mapper, &self.selection) else {
                return;
            };
            selection
                .selection_points()
                .iter()
                .map(|point| mapper.value_to_position(point.value))
                .collect()
        };
        for (handle, position) in self.handles.iter_mut().zip(positions) {
            handle.set_x_position(position);
            handle.set_label_position(position);
        }
    }
}
