use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One input bucket: a half-open value interval plus one volume per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub min: f64,
    pub max: f64,
    pub volume: Vec<f64>,
}

impl Bucket {
    #[must_use]
    pub fn new(min: f64, max: f64, volume: f64) -> Self {
        Self {
            min,
            max,
            volume: vec![volume],
        }
    }

    #[must_use]
    pub fn with_volumes(min: f64, max: f64, volume: Vec<f64>) -> Self {
        Self { min, max, volume }
    }
}

/// One per-pixel sample produced by subdividing a bucket.
///
/// Samples inherit the volumes of the bucket they were carved from; the
/// trailing sample at the global maximum carries no volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub volume: SmallVec<[f64; 2]>,
}

impl Sample {
    #[must_use]
    pub fn new(value: f64, volume: SmallVec<[f64; 2]>) -> Self {
        Self { value, volume }
    }

    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.volume.iter().sum()
    }
}

/// Inclusive value extent of the sampled histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}
