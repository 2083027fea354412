use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Base scheduling unit: a full sweep spans `TRANSITION_TICK_MS * width`
/// milliseconds regardless of how far a boundary has to travel.
pub const TRANSITION_TICK_MS: f64 = 0.5;

/// Slack when comparing elapsed time against step deadlines, so advancing by
/// exactly the planned span lands on every final step despite float rounding.
const STEP_TIME_EPS_MS: f64 = 1e-6;

/// Identifies one planned transition. Stale tokens no longer match anything
/// and cancel requests carrying them become no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionToken {
    generation: u64,
}

impl TransitionToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// One scheduled pixel step of one boundary's sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    pub at_ms: f64,
    pub point_index: usize,
    pub pixel: u32,
    pub final_for_point: bool,
}

/// Outcome of advancing the animation clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionProgress {
    /// No transition in flight.
    Idle,
    Running {
        applied: usize,
        remaining: usize,
    },
    /// The final step was applied during this advance.
    Completed,
}

/// Deterministic sweep schedule for all moving selection boundaries.
///
/// Every moving boundary walks pixel by pixel from its previous position to
/// its target. The per-step delay is `span / (distance + 1)`, so short moves
/// step slowly, long moves step quickly, and every boundary lands on its
/// target at the same wall-clock instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTransition {
    token: TransitionToken,
    steps: Vec<TransitionStep>,
    cursor: usize,
    elapsed_ms: f64,
    span_ms: f64,
}

impl SelectionTransition {
    /// Plans the sweep for `tracks` of `(source, target)` pixels indexed by
    /// boundary. Returns `None` when no boundary moves.
    #[must_use]
    pub fn plan(token: TransitionToken, tracks: &[(u32, u32)], width: u32) -> Option<Self> {
        let span_ms = TRANSITION_TICK_MS * f64::from(width);
        let mut steps = Vec::new();

        for (point_index, &(source, target)) in tracks.iter().enumerate() {
            if source == target {
                continue;
            }
            let distance = source.abs_diff(target);
            let pixel_count = distance + 1;
            let delay_ms = span_ms / f64::from(pixel_count);
            for k in 0..pixel_count {
                let pixel = if target > source {
                    source + k
                } else {
                    source - k
                };
                steps.push(TransitionStep {
                    at_ms: f64::from(k + 1) * delay_ms,
                    point_index,
                    pixel,
                    final_for_point: k + 1 == pixel_count,
                });
            }
        }

        if steps.is_empty() {
            return None;
        }
        steps.sort_by(|a, b| {
            a.at_ms
                .total_cmp(&b.at_ms)
                .then(a.point_index.cmp(&b.point_index))
        });
        Some(Self {
            token,
            steps,
            cursor: 0,
            elapsed_ms: 0.0,
            span_ms,
        })
    }

    #[must_use]
    pub fn token(&self) -> TransitionToken {
        self.token
    }

    #[must_use]
    pub fn steps(&self) -> &[TransitionStep] {
        &self.steps
    }

    /// Wall-clock span of the whole sweep in milliseconds.
    #[must_use]
    pub fn span_ms(&self) -> f64 {
        self.span_ms
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cursor == self.steps.len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    /// Advances the clock and returns the index range of steps now due.
    ///
    /// Negative or non-finite deltas advance by nothing.
    pub fn advance(&mut self, delta_ms: f64) -> Range<usize> {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
        }

        let start = self.cursor;
        while self.cursor < self.steps.len()
            && self.steps[self.cursor].at_ms <= self.elapsed_ms + STEP_TIME_EPS_MS
        {
            self.cursor += 1;
        }
        start..self.cursor
    }
}
