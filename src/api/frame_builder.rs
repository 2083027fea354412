use ordered_float::OrderedFloat;

use crate::core::{IconAlign, IconWidth};
use crate::interaction::SelectionHandle;
use crate::render::{
    ImagePrimitive, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::SelectionEngineConfig;
use super::style_resolver::{StyleContext, resolve_bar_color, resolve_bar_opacity};

const HANDLE_STROKE_PX: f64 = 1.0;
const HANDLE_HOVER_STROKE_PX: f64 = 2.0;
const LABEL_TOP_MARGIN_PX: f64 = 2.0;

/// Index bookkeeping for in-place frame updates.
///
/// The sub-rects of sample `i` occupy
/// `rects[bar_rect_offsets[i]..bar_rect_offsets[i + 1]]`, one per volume
/// series, stacked bottom-up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(super) struct FrameLayout {
    pub bar_rect_offsets: Vec<usize>,
}

/// Materializes the full scene: bars, segment icons, handle lines, labels.
pub(super) fn build_frame(
    ctx: &StyleContext<'_>,
    handles: &[SelectionHandle],
    labels: &[String],
) -> (RenderFrame, FrameLayout) {
    let mut frame = RenderFrame::new(ctx.config.viewport);
    let layout = push_bar_rects(ctx, &mut frame);
    push_segment_icons(ctx, &mut frame);
    frame.lines = handle_lines(handles, ctx.config);
    frame.texts = handle_labels(handles, labels, ctx.config);
    (frame, layout)
}

/// One 1-px column per sample, split into stacked per-series sub-rects and
/// scaled so the largest total volume fills the viewport height.
fn push_bar_rects(ctx: &StyleContext<'_>, frame: &mut RenderFrame) -> FrameLayout {
    let samples = ctx.mapper.samples();
    let pixels = ctx.mapper.bar_pixels();
    let height = f64::from(ctx.config.viewport.height);
    let max_total = samples
        .iter()
        .map(|sample| OrderedFloat(sample.total_volume()))
        .max()
        .map(|value| value.0)
        .unwrap_or(0.0);

    let mut offsets = Vec::with_capacity(samples.len() + 1);
    offsets.push(0);

    for (sample, &pixel) in samples.iter().zip(pixels) {
        if max_total > 0.0 {
            let opacity = resolve_bar_opacity(ctx, pixel);
            let mut top = height;
            for (volume_index, &volume) in sample.volume.iter().enumerate() {
                let bar_height = volume / max_total * height;
                let color = resolve_bar_color(ctx, pixel, volume_index).with_opacity(opacity);
                top -= bar_height;
                frame
                    .rects
                    .push(RectPrimitive::new(f64::from(pixel), top, 1.0, bar_height, color));
            }
        }
        offsets.push(frame.rects.len());
    }

    FrameLayout {
        bar_rect_offsets: offsets,
    }
}

/// Icons of enabled segments, centered horizontally in the segment span.
fn push_segment_icons(ctx: &StyleContext<'_>, frame: &mut RenderFrame) {
    let height = f64::from(ctx.config.viewport.height);
    for segment in ctx.selection.segments() {
        let Some(icon) = &segment.icon else {
            continue;
        };
        if segment.disabled {
            continue;
        }

        let span = f64::from(segment.position.span());
        let icon_width = match icon.width {
            IconWidth::Stretch => span,
            IconWidth::Fixed(width) => width,
        };
        if icon_width <= 0.0 {
            continue;
        }

        let center_x = f64::from(segment.position.from) + span / 2.0;
        let (anchor_y, top_offset) = match icon.align {
            IconAlign::Center => (height / 2.0, icon.height / 2.0),
            IconAlign::Bottom => (height * 0.75, icon.height),
        };

        frame.images.push(ImagePrimitive::new(
            icon.source.clone(),
            center_x - icon_width / 2.0,
            anchor_y - top_offset,
            icon_width,
            icon.height,
        ));
    }
}

/// Full-height stroke per visible handle; hover thickens it.
pub(super) fn handle_lines(
    handles: &[SelectionHandle],
    config: &SelectionEngineConfig,
) -> Vec<LinePrimitive> {
    let height = f64::from(config.viewport.height);
    handles
        .iter()
        .filter(|handle| !handle.is_hidden())
        .map(|handle| {
            let x = f64::from(handle.x_position());
            let stroke = if handle.is_hovered() {
                HANDLE_HOVER_STROKE_PX
            } else {
                HANDLE_STROKE_PX
            };
            LinePrimitive::new(x, 0.0, x, height, stroke, config.handle_color)
        })
        .collect()
}

/// Value labels of visible handles, anchored at the label position plus its
/// collision offset. `labels` aligns with `handles`.
pub(super) fn handle_labels(
    handles: &[SelectionHandle],
    labels: &[String],
    config: &SelectionEngineConfig,
) -> Vec<TextPrimitive> {
    handles
        .iter()
        .zip(labels)
        .filter(|(handle, text)| !handle.is_hidden() && handle.label_visible() && !text.is_empty())
        .map(|(handle, text)| {
            TextPrimitive::new(
                text.clone(),
                f64::from(handle.label_position()) + handle.label_offset(),
                LABEL_TOP_MARGIN_PX,
                config.font_size_px,
                config.handle_color,
                TextHAlign::Center,
            )
        })
        .collect()
}
