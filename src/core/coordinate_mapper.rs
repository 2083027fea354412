use std::ops::Range;

use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::types::{Bucket, MinMax, Sample};
use crate::error::{HistogramError, HistogramResult};

/// Maps histogram buckets into per-pixel samples and converts between data
/// values and horizontal pixel positions.
///
/// The pixel space is the inclusive range `[0, width]`: position `0` maps to
/// the sampled minimum and position `width` maps to the sampled maximum, so a
/// selection boundary can sit on either edge of the drawing area.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    samples: Vec<Sample>,
    bar_pixels: Vec<u32>,
    min_max: MinMax,
    value_ratio: f64,
    width: u32,
}

impl CoordinateMapper {
    pub fn new(buckets: &[Bucket], width: u32) -> HistogramResult<Self> {
        if width == 0 {
            return Err(HistogramError::InvalidData(
                "histogram width must be > 0".to_owned(),
            ));
        }
        if buckets.is_empty() {
            return Err(HistogramError::InvalidData(
                "histogram needs at least one bucket".to_owned(),
            ));
        }
        for (index, bucket) in buckets.iter().enumerate() {
            if !bucket.min.is_finite() || !bucket.max.is_finite() || bucket.min >= bucket.max {
                return Err(HistogramError::InvalidData(format!(
                    "bucket {index} must have finite bounds with min < max"
                )));
            }
            if bucket.volume.is_empty() {
                return Err(HistogramError::InvalidData(format!(
                    "bucket {index} must carry at least one volume entry"
                )));
            }
            if bucket.volume.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(HistogramError::InvalidData(format!(
                    "bucket {index} volumes must be finite and >= 0"
                )));
            }
            if index > 0 && bucket.min < buckets[index - 1].max {
                return Err(HistogramError::InvalidData(
                    "buckets must be ascending and non-overlapping".to_owned(),
                ));
            }
        }

        let samples = subdivide_buckets(buckets, width);
        let min = scan_samples(&samples, |a, b| a.min(b))?;
        let max = scan_samples(&samples, |a, b| a.max(b))?;
        if min >= max {
            return Err(HistogramError::InvalidData(
                "histogram samples must span a non-zero value range".to_owned(),
            ));
        }

        let min_max = MinMax::new(min, max);
        let value_ratio = (max - min) / f64::from(width);
        let bar_pixels = samples
            .iter()
            .map(|sample| pixel_for_value(sample.value, min_max, value_ratio))
            .collect();

        Ok(Self {
            samples,
            bar_pixels,
            min_max,
            value_ratio,
            width,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn min_max(&self) -> MinMax {
        self.min_max
    }

    /// Data-value span covered by one horizontal pixel.
    #[must_use]
    pub fn value_ratio(&self) -> f64 {
        self.value_ratio
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Pixel column of each sample, ascending, aligned with `samples()`.
    #[must_use]
    pub fn bar_pixels(&self) -> &[u32] {
        &self.bar_pixels
    }

    /// Converts a pixel position back into a data value.
    ///
    /// The edges return the sampled extremes exactly; interior positions
    /// interpolate linearly.
    #[must_use]
    pub fn position_to_value(&self, position: u32) -> f64 {
        if position == 0 {
            return self.min_max.min;
        }
        if position == self.width {
            return self.min_max.max;
        }
        f64::from(position) * self.value_ratio + self.min_max.min
    }

    /// Converts a data value into a pixel position in `[0, width]`.
    ///
    /// Out-of-range values are clamped to the sampled extent first.
    #[must_use]
    pub fn value_to_position(&self, value: f64) -> u32 {
        pixel_for_value(value, self.min_max, self.value_ratio)
    }

    /// Index range of the samples whose bar column sits at `pixel`.
    ///
    /// Empty when no sample rounds onto that column; wider than one when
    /// several samples share it.
    #[must_use]
    pub fn bar_indices_at_pixel(&self, pixel: u32) -> Range<usize> {
        let start = self.bar_pixels.partition_point(|&px| px < pixel);
        let end = self.bar_pixels.partition_point(|&px| px <= pixel);
        start..end
    }
}

fn pixel_for_value(value: f64, min_max: MinMax, value_ratio: f64) -> u32 {
    let constrained = min_max.clamp(value);
    (constrained / value_ratio - min_max.min / value_ratio).round() as u32
}

fn scan_samples(samples: &[Sample], fold: impl Fn(f64, f64) -> f64) -> HistogramResult<f64> {
    samples
        .iter()
        .map(|sample| OrderedFloat(sample.value))
        .reduce(|a, b| OrderedFloat(fold(a.0, b.0)))
        .map(|value| value.0)
        .ok_or_else(|| HistogramError::InvalidData("histogram produced no samples".to_owned()))
}

/// Carves `width - 1` bars-per-bucket worth of samples out of each bucket and
/// appends one volume-less sample at the last bucket's maximum.
///
/// The per-bucket sample count is `ceil((max - min) / step)`, so the total is
/// exactly `width` whenever `buckets.len()` divides `width - 1`.
fn subdivide_buckets(buckets: &[Bucket], width: u32) -> Vec<Sample> {
    let bars_per_bucket = f64::from(width - 1) / buckets.len() as f64;
    let mut samples = Vec::with_capacity(width as usize + 1);

    for bucket in buckets {
        let step = (bucket.max - bucket.min) / bars_per_bucket;
        let count = ((bucket.max - bucket.min) / step).ceil() as usize;
        for index in 0..count {
            let value = bucket.min + index as f64 * step;
            samples.push(Sample::new(value, SmallVec::from_slice(&bucket.volume)));
        }
    }

    // The subdivision stops short of each bucket's max; close the range with
    // its global maximum so the last pixel column maps to it exactly.
    let last = &buckets[buckets.len() - 1];
    samples.push(Sample::new(last.max, SmallVec::new()));
    samples
}
