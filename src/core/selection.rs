use serde::{Deserialize, Serialize};

use crate::core::coordinate_mapper::CoordinateMapper;
use crate::error::{HistogramError, HistogramResult};
use crate::render::primitives::Color;

/// Decorative icon drawn inside a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentIcon {
    /// Path to a PNG asset; resolved by the renderer backend.
    pub source: String,
    pub width: IconWidth,
    pub height: f64,
    pub align: IconAlign,
}

impl SegmentIcon {
    #[must_use]
    pub fn stretched(source: impl Into<String>, height: f64) -> Self {
        Self {
            source: source.into(),
            width: IconWidth::Stretch,
            height,
            align: IconAlign::Center,
        }
    }

    #[must_use]
    pub fn fixed(source: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            source: source.into(),
            width: IconWidth::Fixed(width),
            height,
            align: IconAlign::Center,
        }
    }

    #[must_use]
    pub fn bottom_aligned(mut self) -> Self {
        self.align = IconAlign::Bottom;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IconWidth {
    /// Stretch to the segment's current pixel width.
    Stretch,
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconAlign {
    /// Centered vertically in the drawing area.
    Center,
    /// Anchored three quarters of the way down, sitting on that line.
    Bottom,
}

/// Host-facing description of one segment; also the payload shape emitted in
/// `SelectionChanged` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub icon: Option<SegmentIcon>,
}

impl SegmentSpec {
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            disabled: false,
            color: None,
            colors: Vec::new(),
            opacity: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// One color per volume series, overriding the plain segment color.
    #[must_use]
    pub fn with_volume_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: SegmentIcon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Horizontal pixel placement of a segment, cached alongside its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRange {
    pub from: u32,
    pub to: u32,
}

impl PixelRange {
    #[must_use]
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn span(self) -> u32 {
        self.to.saturating_sub(self.from)
    }
}

/// One segment of the live selection, carrying its cached pixel placement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSegment {
    pub from: f64,
    pub to: f64,
    pub disabled: bool,
    pub color: Option<Color>,
    pub colors: Vec<Color>,
    pub opacity: Option<f64>,
    pub icon: Option<SegmentIcon>,
    pub position: PixelRange,
}

impl SelectionSegment {
    fn from_spec(spec: SegmentSpec) -> Self {
        Self {
            from: spec.from,
            to: spec.to,
            disabled: spec.disabled,
            color: spec.color,
            colors: spec.colors,
            opacity: spec.opacity,
            icon: spec.icon,
            position: PixelRange::default(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> SegmentSpec {
        SegmentSpec {
            from: self.from,
            to: self.to,
            disabled: self.disabled,
            color: self.color,
            colors: self.colors.clone(),
            opacity: self.opacity,
            icon: self.icon.clone(),
        }
    }
}

/// A segment boundary: shared by two adjacent segments except at the ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPoint {
    pub value: f64,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Plain range selection; clicking inside a segment does nothing.
    Range,
    /// Clicking inside a segment flips it between enabled and disabled.
    Toggle,
}

/// Ordered, contiguous multi-segment selection over the histogram's value
/// range.
///
/// Invariants enforced at construction and preserved by every mutation:
/// segments stay ordered and contiguous (`segment[i].to == segment[i + 1].from`)
/// and there are exactly `segment_count() + 1` boundary points.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSelection {
    segments: Vec<SelectionSegment>,
    mode: SelectionMode,
    hidden_points: Vec<bool>,
}

impl HistogramSelection {
    pub fn new(specs: Vec<SegmentSpec>, mode: SelectionMode) -> HistogramResult<Self> {
        if specs.is_empty() {
            return Err(HistogramError::InvalidSelection(
                "selection needs at least one segment".to_owned(),
            ));
        }

        for (index, spec) in specs.iter().enumerate() {
            if !spec.from.is_finite() || !spec.to.is_finite() {
                return Err(HistogramError::InvalidSelection(format!(
                    "segment {index} bounds must be finite"
                )));
            }
            if spec.from > spec.to {
                return Err(HistogramError::InvalidSelection(format!(
                    "segment {index} must satisfy from <= to"
                )));
            }
            if let Some(next) = specs.get(index + 1)
                && spec.to != next.from
            {
                return Err(HistogramError::InvalidSelection(format!(
                    "segment {index} ends at {} but segment {} starts at {}",
                    spec.to,
                    index + 1,
                    next.from
                )));
            }
            if let Some(opacity) = spec.opacity
                && (!opacity.is_finite() || !(0.0..=1.0).contains(&opacity))
            {
                return Err(HistogramError::InvalidSelection(format!(
                    "segment {index} opacity must be within [0, 1]"
                )));
            }
            if spec.color.is_some_and(|color| !color.is_valid())
                || spec.colors.iter().any(|color| !color.is_valid())
            {
                return Err(HistogramError::InvalidSelection(format!(
                    "segment {index} colors must have channels within [0, 1]"
                )));
            }
            if let Some(icon) = &spec.icon {
                if icon.source.is_empty() {
                    return Err(HistogramError::InvalidSelection(format!(
                        "segment {index} icon source must not be empty"
                    )));
                }
                if !icon.height.is_finite() || icon.height <= 0.0 {
                    return Err(HistogramError::InvalidSelection(format!(
                        "segment {index} icon height must be finite and > 0"
                    )));
                }
                if let IconWidth::Fixed(width) = icon.width
                    && (!width.is_finite() || width <= 0.0)
                {
                    return Err(HistogramError::InvalidSelection(format!(
                        "segment {index} icon width must be finite and > 0"
                    )));
                }
            }
        }

        let hidden_points = vec![false; specs.len() + 1];
        Ok(Self {
            segments: specs.into_iter().map(SelectionSegment::from_spec).collect(),
            mode,
            hidden_points,
        })
    }

    /// Convenience constructor for a plain range selection.
    pub fn range(specs: Vec<SegmentSpec>) -> HistogramResult<Self> {
        Self::new(specs, SelectionMode::Range)
    }

    /// Convenience constructor for a toggleable selection.
    pub fn toggle(specs: Vec<SegmentSpec>) -> HistogramResult<Self> {
        Self::new(specs, SelectionMode::Toggle)
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[must_use]
    pub fn allows_toggle(&self) -> bool {
        self.mode == SelectionMode::Toggle
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.segments.len() + 1
    }

    #[must_use]
    pub fn segments(&self) -> &[SelectionSegment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [SelectionSegment] {
        &mut self.segments
    }

    /// Hides or shows the boundary point (and its handle) at `index`.
    pub fn set_point_hidden(&mut self, index: usize, hidden: bool) -> HistogramResult<()> {
        let count = self.point_count();
        let Some(slot) = self.hidden_points.get_mut(index) else {
            return Err(HistogramError::HandleOutOfRange {
                index,
                handle_count: count,
            });
        };
        *slot = hidden;
        Ok(())
    }

    /// Boundary points in segment order: each segment's `from` plus the last
    /// segment's `to`. Contiguity makes interior points shared.
    #[must_use]
    pub fn selection_points(&self) -> Vec<SelectionPoint> {
        let mut points = Vec::with_capacity(self.point_count());
        for (index, segment) in self.segments.iter().enumerate() {
            points.push(SelectionPoint {
                value: segment.from,
                hidden: self.hidden_points.get(index).copied().unwrap_or(false),
            });
        }
        if let Some(last) = self.segments.last() {
            points.push(SelectionPoint {
                value: last.to,
                hidden: self
                    .hidden_points
                    .get(self.segments.len())
                    .copied()
                    .unwrap_or(false),
            });
        }
        points
    }

    /// Snapshot of the selection without pixel caches; the `SelectionChanged`
    /// payload and the dirty-check currency.
    #[must_use]
    pub fn output_selection(&self) -> Vec<SegmentSpec> {
        self.segments.iter().map(SelectionSegment::spec).collect()
    }

    /// Recomputes every cached pixel range from the segment values.
    pub(crate) fn sync_positions(&mut self, mapper: &CoordinateMapper) {
        for segment in &mut self.segments {
            segment.position = PixelRange::new(
                mapper.value_to_position(segment.from),
                mapper.value_to_position(segment.to),
            );
        }
    }

    /// Rewrites segment bounds from an ascending list of boundary pixels.
    ///
    /// `points` overrides the value stored at each boundary; without it the
    /// pixel is converted back into a value. Positions beyond the boundary
    /// count are ignored.
    pub(crate) fn update_from_boundary_positions(
        &mut self,
        positions: &[u32],
        points: Option<&[SelectionPoint]>,
        mapper: &CoordinateMapper,
    ) {
        for index in 0..self.segments.len() {
            let (Some(&from_px), Some(&to_px)) = (positions.get(index), positions.get(index + 1))
            else {
                break;
            };
            let from_value = match points.and_then(|p| p.get(index)) {
                Some(point) => point.value,
                None => mapper.position_to_value(from_px),
            };
            let to_value = match points.and_then(|p| p.get(index + 1)) {
                Some(point) => point.value,
                None => mapper.position_to_value(to_px),
            };
            let segment = &mut self.segments[index];
            segment.position = PixelRange::new(from_px, to_px);
            segment.from = from_value;
            segment.to = to_value;
        }
    }

    /// Moves the boundary at `index` to `value` and reflows the adjacent
    /// segments. The exact value is kept; only positions are re-derived.
    ///
    /// Callers keep `value` within the neighboring boundary values so the
    /// ordering invariant holds.
    pub(crate) fn apply_boundary_edit(&mut self, index: usize, value: f64, mapper: &CoordinateMapper) {
        let mut points = self.selection_points();
        let Some(point) = points.get_mut(index) else {
            return;
        };
        point.value = value;

        let positions: Vec<u32> = points
            .iter()
            .map(|point| mapper.value_to_position(point.value))
            .collect();
        self.update_from_boundary_positions(&positions, Some(&points), mapper);
    }
}

/// Whether replacing the current selection requires a structural rebuild.
///
/// Only boundary values matter here; style-only changes take the cheap
/// adoption path.
#[must_use]
pub fn needs_refresh(current: Option<&HistogramSelection>, next: &HistogramSelection) -> bool {
    let Some(current) = current else {
        return true;
    };
    if current.segment_count() != next.segment_count() {
        return true;
    }
    current
        .segments
        .iter()
        .zip(next.segments.iter())
        .any(|(a, b)| a.from != b.from || a.to != b.to)
}
