//! Overlap detection between consecutive frames.
//!
//! The trailing band of the first frame is compared against the leading band
//! of the second for a ladder of candidate sizes. Each comparison is a
//! zero-mean normalized cross-correlation, so the score ignores a uniform
//! brightness offset between the two frames.

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::stitching::common::error::{Result, StitchError};
use crate::stitching::raster::{Axis, Band, RasterImage, CHANNELS};

pub const DEFAULT_MIN_OVERLAP: usize = 50;
pub const DEFAULT_SEARCH_STRIDE: usize = 10;

/// Sums of squared deviations at or below this are treated as a flat region.
const MIN_DEVIATION_SUM: f64 = 0.5;

/// Outcome of an overlap search. `overlap_size == 0` means no reliable overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlapResult {
    pub overlap_size: usize,
    pub confidence: f64,
}

impl OverlapResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_found(&self) -> bool {
        self.overlap_size > 0
    }
}

pub struct OverlapDetector {
    min_overlap: usize,
    stride: usize,
}

impl Default for OverlapDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapDetector {
    pub fn new() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
            stride: DEFAULT_SEARCH_STRIDE,
        }
    }

    pub fn with_search(min_overlap: usize, stride: usize) -> Self {
        Self {
            min_overlap: min_overlap.max(1),
            stride: stride.max(1),
        }
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Overlap sizes tried for frames of the given extents, ascending.
    pub fn candidate_sizes(&self, extent_a: usize, extent_b: usize, max_overlap_ratio: f64) -> Vec<usize> {
        let max_overlap = (extent_a.min(extent_b) as f64 * max_overlap_ratio).floor() as usize;
        let max_overlap = max_overlap.min(extent_a).min(extent_b);
        (self.min_overlap..=max_overlap).step_by(self.stride).collect()
    }

    #[instrument(skip(self, frame_a, frame_b), fields(extent_a = frame_a.extent(axis), extent_b = frame_b.extent(axis)))]
    pub fn find_overlap(
        &self,
        frame_a: &RasterImage,
        frame_b: &RasterImage,
        axis: Axis,
        similarity_threshold: f64,
        max_overlap_ratio: f64,
    ) -> Result<OverlapResult> {
        if frame_a.cross_extent(axis) != frame_b.cross_extent(axis) {
            return Err(StitchError::DimensionMismatch {
                axis,
                frame_index: 1,
                expected: frame_a.cross_extent(axis),
                found: frame_b.cross_extent(axis),
            });
        }

        let extent_a = frame_a.extent(axis);
        let candidates = self.candidate_sizes(extent_a, frame_b.extent(axis), max_overlap_ratio);
        if candidates.is_empty() {
            debug!("Search space is empty, no overlap");
            return Ok(OverlapResult::none());
        }

        let scores = candidates
            .par_iter()
            .map(|&size| -> Result<(usize, f64)> {
                let template = frame_a.band(axis, extent_a - size, size)?;
                let region = frame_b.band(axis, 0, size)?;
                Ok((size, normalized_cross_correlation(&template, &region)))
            })
            .collect::<Result<Vec<_>>>()?;

        // Ascending scan keeps the smallest size on ties
        let mut best = OverlapResult::none();
        for (size, score) in scores {
            trace!(size, score, "Scored overlap candidate");
            if score >= similarity_threshold && score > best.confidence {
                best = OverlapResult {
                    overlap_size: size,
                    confidence: score,
                };
            }
        }

        debug!(
            overlap = best.overlap_size,
            confidence = best.confidence,
            candidates = candidates.len(),
            "Overlap search complete"
        );
        Ok(best)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelSums {
    t: f64,
    r: f64,
    tt: f64,
    rr: f64,
    tr: f64,
}

/// Zero-mean normalized cross-correlation of two equally shaped bands.
///
/// Means are taken per channel and the products summed over all channels.
/// Returns 0 when either band is flat; the result is clamped to `[-1, 1]`.
pub fn normalized_cross_correlation(template: &Band<'_>, region: &Band<'_>) -> f64 {
    debug_assert_eq!(template.rows().len(), region.rows().len());
    debug_assert_eq!(template.cols().len(), region.cols().len());

    let n = template.pixel_count() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let mut sums = [ChannelSums::default(); CHANNELS];
    for (t_seg, r_seg) in template.segments().zip(region.segments()) {
        for (tp, rp) in t_seg.chunks_exact(CHANNELS).zip(r_seg.chunks_exact(CHANNELS)) {
            for (acc, (&t, &r)) in sums.iter_mut().zip(tp.iter().zip(rp)) {
                let (t, r) = (t as f64, r as f64);
                acc.t += t;
                acc.r += r;
                acc.tt += t * t;
                acc.rr += r * r;
                acc.tr += t * r;
            }
        }
    }

    let (mut cross, mut t_dev, mut r_dev) = (0.0, 0.0, 0.0);
    for acc in &sums {
        cross += acc.tr - acc.t * acc.r / n;
        t_dev += acc.tt - acc.t * acc.t / n;
        r_dev += acc.rr - acc.r * acc.r / n;
    }

    if t_dev <= MIN_DEVIATION_SUM || r_dev <= MIN_DEVIATION_SUM {
        return 0.0;
    }
    (cross / (t_dev * r_dev).sqrt()).clamp(-1.0, 1.0)
}
