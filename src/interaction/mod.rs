pub mod handle;

pub use handle::{HandleEvent, SelectionHandle};

use serde::{Deserialize, Serialize};

/// Half-width of the pointer hit area around a handle's pixel column.
pub const HANDLE_HIT_HALF_WIDTH_PX: f64 = 5.0;

/// Lifecycle of the rendered selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionPhase {
    /// Engine constructed; no histogram refreshed yet.
    Idle,
    /// Selection laid out and responsive to pointer input.
    Rendered,
    /// A handle drag is in progress; all other handles are locked out.
    Dragging,
    /// A transition is sweeping handles toward their new positions.
    Animating,
}

impl InteractionPhase {
    #[must_use]
    pub fn is_dragging(self) -> bool {
        self == Self::Dragging
    }

    #[must_use]
    pub fn is_animating(self) -> bool {
        self == Self::Animating
    }
}
