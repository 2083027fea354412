use serde::{Deserialize, Serialize};

use crate::core::SegmentSpec;

/// Notifications emitted by the selection engine.
///
/// The set is closed: hosts match exhaustively and adding a variant is a
/// compile-time visible change, not a silently dropped string topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The pointer moved over a segment (`Some`) or left the selection
    /// entirely (`None`). Emitted only when the hovered segment changes.
    SelectionOver { segment_index: Option<usize> },
    /// A segment was toggled; `enabled` is the state after the flip.
    ToggleSelection { segment_index: usize, enabled: bool },
    /// Boundary values changed; carries the full output selection.
    SelectionChanged { selection: Vec<SegmentSpec> },
    /// A handle was clicked. Emitted for every handle click, whether or not
    /// an edit is started by it.
    HandleClick { handle_index: usize, value: f64 },
}

/// Host-side sink for selection events.
///
/// Observers run synchronously, in registration order, on the thread driving
/// the engine.
pub trait SelectionObserver {
    fn on_event(&mut self, event: &SelectionEvent);
}
