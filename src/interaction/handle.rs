use crate::core::CoordinateMapper;
use crate::interaction::HANDLE_HIT_HALF_WIDTH_PX;

/// Drag lifecycle notification produced by a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleEvent {
    DragStarted { index: usize },
    Dragged { index: usize, x: u32 },
    DragEnded { index: usize },
}

/// Draggable control bound to one selection boundary.
///
/// `index` is the boundary index the handle was created for and never
/// changes; the horizontal position moves freely while dragging or
/// animating.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHandle {
    index: usize,
    value: f64,
    x_position: u32,
    label_position: u32,
    label_offset: f64,
    hidden: bool,
    disabled: bool,
    hovered: bool,
    label_visible: bool,
    dragging: bool,
}

impl SelectionHandle {
    #[must_use]
    pub fn new(index: usize, value: f64, mapper: &CoordinateMapper) -> Self {
        let x = mapper.value_to_position(value);
        Self {
            index,
            value,
            x_position: x,
            label_position: x,
            label_offset: 0.0,
            hidden: false,
            disabled: false,
            hovered: false,
            label_visible: false,
            dragging: false,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    #[must_use]
    pub fn x_position(&self) -> u32 {
        self.x_position
    }

    pub fn set_x_position(&mut self, x: u32) {
        self.x_position = x;
    }

    /// Label anchor; follows the handle except when moved independently
    /// during a transition sweep.
    #[must_use]
    pub fn label_position(&self) -> u32 {
        self.label_position
    }

    pub fn set_label_position(&mut self, x: u32) {
        self.label_position = x;
    }

    #[must_use]
    pub fn label_offset(&self) -> f64 {
        self.label_offset
    }

    pub fn set_label_offset(&mut self, offset: f64) {
        self.label_offset = offset;
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hover_state(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    #[must_use]
    pub fn label_visible(&self) -> bool {
        self.label_visible
    }

    pub fn show_label(&mut self) {
        self.label_visible = true;
    }

    pub fn hide_label(&mut self) {
        self.label_visible = false;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a pointer at `x` grabs this handle.
    #[must_use]
    pub fn hit_test(&self, x: f64) -> bool {
        !self.hidden && (x - f64::from(self.x_position)).abs() <= HANDLE_HIT_HALF_WIDTH_PX
    }

    /// Starts a drag gesture. Hidden, disabled, or already dragging handles
    /// refuse.
    pub fn begin_drag(&mut self) -> Option<HandleEvent> {
        if self.hidden || self.disabled || self.dragging {
            return None;
        }
        self.dragging = true;
        Some(HandleEvent::DragStarted { index: self.index })
    }

    /// Moves the handle to the pointer position, clamped to `[0, width]` and
    /// rounded to the pixel grid. Emits only on actual movement.
    pub fn drag_to(&mut self, x: f64, width: u32) -> Option<HandleEvent> {
        if !self.dragging || !x.is_finite() {
            return None;
        }

        let position = x.clamp(0.0, f64::from(width)).round() as u32;
        if position == self.x_position {
            return None;
        }
        self.x_position = position;
        self.label_position = position;
        Some(HandleEvent::Dragged {
            index: self.index,
            x: position,
        })
    }

    pub fn end_drag(&mut self) -> Option<HandleEvent> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        Some(HandleEvent::DragEnded { index: self.index })
    }
}
