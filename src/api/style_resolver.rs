use crate::core::{CoordinateMapper, HistogramSelection};
use crate::render::Color;

use super::SelectionEngineConfig;

/// Everything the per-pixel style rules read.
pub(super) struct StyleContext<'a> {
    pub mapper: &'a CoordinateMapper,
    pub selection: &'a HistogramSelection,
    pub hover_index: Option<usize>,
    pub config: &'a SelectionEngineConfig,
}

/// Index of the segment whose cached pixel range contains column `x`.
///
/// Segments own their `from` column and exclude their `to` column, except the
/// last segment which owns both ends.
pub(super) fn segment_index_at_pixel(selection: &HistogramSelection, x: u32) -> Option<usize> {
    let segments = selection.segments();
    segments.iter().enumerate().find_map(|(index, segment)| {
        let last = index + 1 == segments.len();
        let contains = x >= segment.position.from
            && (x < segment.position.to || (last && x <= segment.position.to));
        contains.then_some(index)
    })
}

/// Fill color for the bar column at `x`, series `volume_index`.
///
/// Precedence: outside any segment, then divider columns of enabled
/// segments, then disabled segments, then toggle hover, then the segment's
/// explicit per-series or plain color, then the configured fallback.
pub(super) fn resolve_bar_color(ctx: &StyleContext<'_>, x: u32, volume_index: usize) -> Color {
    let config = ctx.config;
    let Some(index) = segment_index_at_pixel(ctx.selection, x) else {
        return config.inactive_bar_color;
    };
    let segments = ctx.selection.segments();
    let segment = &segments[index];

    if let Some(divider) = config.segment_divider_color
        && segments
            .iter()
            .any(|s| !s.disabled && (s.position.from == x || s.position.to == x))
    {
        return divider;
    }
    if segment.disabled {
        return config.inactive_bar_color;
    }
    if ctx.selection.allows_toggle() && ctx.hover_index == Some(index) {
        return config.over_selection_color;
    }

    segment
        .colors
        .get(volume_index)
        .copied()
        .or(segment.color)
        .unwrap_or(config.selection_color)
}

/// Opacity for the bar column at `x`.
///
/// Disabled wins over hover; bars inside an enabled, unhovered segment use
/// the segment's explicit opacity or full opacity.
pub(super) fn resolve_bar_opacity(ctx: &StyleContext<'_>, x: u32) -> f64 {
    let config = ctx.config;
    let Some(index) = segment_index_at_pixel(ctx.selection, x) else {
        return config.inactive_bar_opacity;
    };
    let segment = &ctx.selection.segments()[index];

    if segment.disabled {
        return config.inactive_bar_opacity;
    }
    if ctx.selection.allows_toggle() && ctx.hover_index == Some(index) {
        return config.over_selection_opacity;
    }
    segment.opacity.unwrap_or(1.0)
}
