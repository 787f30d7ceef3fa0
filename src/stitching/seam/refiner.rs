use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::stitching::common::error::{Result, StitchError};
use crate::stitching::raster::{Axis, Band, RasterImage};

pub const DEFAULT_REFINE_STRIDE: usize = 5;

/// Sharpens a coarse overlap estimate by minimizing the raw pixel difference.
///
/// For each offset the first `offset` lines of the overlap in frame A are
/// dropped and the rest is compared with the same number of leading lines of
/// frame B. The score is an unnormalized sum of squared differences, so it is
/// only meaningful within one overlap band.
pub struct SeamRefiner {
    stride: usize,
}

impl Default for SeamRefiner {
    fn default() -> Self {
        Self::new()
    }
}

impl SeamRefiner {
    pub fn new() -> Self {
        Self {
            stride: DEFAULT_REFINE_STRIDE,
        }
    }

    pub fn with_stride(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the offset in `[0, overlap_size)` with the smallest SSD, or 0
    /// for an empty overlap. The refined overlap is `overlap_size - offset`.
    #[instrument(skip(self, frame_a, frame_b))]
    pub fn refine(
        &self,
        frame_a: &RasterImage,
        frame_b: &RasterImage,
        overlap_size: usize,
        axis: Axis,
    ) -> Result<usize> {
        if frame_a.cross_extent(axis) != frame_b.cross_extent(axis) {
            return Err(StitchError::DimensionMismatch {
                axis,
                frame_index: 1,
                expected: frame_a.cross_extent(axis),
                found: frame_b.cross_extent(axis),
            });
        }
        if overlap_size == 0 {
            return Ok(0);
        }

        let extent_a = frame_a.extent(axis);
        if overlap_size > extent_a {
            return Err(StitchError::RegionOutOfBounds {
                start: 0,
                len: overlap_size,
                extent: extent_a,
            });
        }
        let band_start = extent_a - overlap_size;

        let offsets: Vec<usize> = (0..overlap_size).step_by(self.stride).collect();
        let scores = offsets
            .par_iter()
            .map(|&offset| -> Result<(usize, f64)> {
                let len = overlap_size - offset;
                let tail = frame_a.band(axis, band_start + offset, len)?;
                let head = frame_b.band(axis, 0, len)?;
                Ok((offset, sum_squared_difference(&tail, &head)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut best_offset = 0;
        let mut min_diff = f64::INFINITY;
        for (offset, diff) in scores {
            trace!(offset, diff, "Scored seam offset");
            if diff < min_diff {
                min_diff = diff;
                best_offset = offset;
            }
        }

        debug!(offset = best_offset, ssd = min_diff, "Seam refined");
        Ok(best_offset)
    }
}

fn sum_squared_difference(a: &Band<'_>, b: &Band<'_>) -> f64 {
    a.segments()
        .zip(b.segments())
        .flat_map(|(sa, sb)| sa.iter().zip(sb))
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum()
}
