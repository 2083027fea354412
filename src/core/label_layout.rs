//! Deterministic text measurement and handle-label collision layout.
//!
//! Backends may measure text precisely when they draw it; layout decisions go
//! through this estimate so positions do not depend on the backend in use.

/// Minimum horizontal gap kept between two adjacent handle labels.
pub const LABEL_GAP_PX: f64 = 4.0;

/// Approximates rendered text width from per-glyph width classes.
#[must_use]
pub fn estimate_label_text_width_px(label: &str, font_size_px: f64) -> f64 {
    let mut width_units = 0.0_f64;
    for ch in label.chars() {
        width_units += match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        };
    }

    (width_units * font_size_px).max(font_size_px)
}

/// Offsets that keep the labels of two adjacent handles apart.
///
/// Pushes the pair symmetrically by half the overlap, then clamps each label
/// back inside `[0, width]`. Returns `(left_offset, right_offset)` to add to
/// the respective label positions.
#[must_use]
pub fn handle_label_offsets(
    left_x: f64,
    right_x: f64,
    left_label: &str,
    right_label: &str,
    font_size_px: f64,
    width: u32,
) -> (f64, f64) {
    let left_half = estimate_label_text_width_px(left_label, font_size_px) / 2.0;
    let right_half = estimate_label_text_width_px(right_label, font_size_px) / 2.0;
    let needed = left_half + right_half + LABEL_GAP_PX;
    let overlap = needed - (right_x - left_x);

    let (mut left_offset, mut right_offset) = if overlap > 0.0 {
        (-overlap / 2.0, overlap / 2.0)
    } else {
        (0.0, 0.0)
    };

    let width = f64::from(width);
    if left_x + left_offset - left_half < 0.0 {
        left_offset = left_half - left_x;
    }
    if right_x + right_offset + right_half > width {
        right_offset = width - right_x - right_half;
    }

    (left_offset, right_offset)
}
