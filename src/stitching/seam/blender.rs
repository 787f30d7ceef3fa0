use tracing::{debug, instrument};

use crate::stitching::common::error::{Result, StitchError};
use crate::stitching::raster::{Axis, RasterImage, CHANNELS};

/// Joins two frames, cross-fading the overlap band.
///
/// Lines before the band come verbatim from frame A, lines after it verbatim
/// from frame B. Inside the band the weights follow [`blend_weights`].
pub struct SeamBlender;

/// Weights `(a, b)` applied to line `i` of an overlap band.
///
/// The first `blend_width` lines ramp B in from 0, the lines within
/// `blend_width` of the far edge ramp A out to `1 / blend_width`, and
/// anything in between is a flat 50/50 average. The leading ramp takes
/// precedence when the two overlap.
pub fn blend_weights(i: usize, overlap_size: usize, blend_width: usize) -> (f32, f32) {
    let width = blend_width.max(1) as f32;
    if i < blend_width {
        let weight_b = i as f32 / width;
        (1.0 - weight_b, weight_b)
    } else if i + blend_width > overlap_size {
        let weight_a = overlap_size.saturating_sub(i) as f32 / width;
        (weight_a, 1.0 - weight_a)
    } else {
        (0.5, 0.5)
    }
}

#[inline]
fn mix(a: u8, b: u8, weight_a: f32, weight_b: f32) -> u8 {
    (a as f32 * weight_a + b as f32 * weight_b).round().clamp(0.0, 255.0) as u8
}

fn mix_into(out: &mut Vec<u8>, a: &[u8], b: &[u8], (weight_a, weight_b): (f32, f32)) {
    out.extend(a.iter().zip(b).map(|(&x, &y)| mix(x, y, weight_a, weight_b)));
}

impl SeamBlender {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, frame_a, frame_b))]
    pub fn blend(
        &self,
        frame_a: &RasterImage,
        frame_b: &RasterImage,
        overlap_size: usize,
        blend_width: usize,
        axis: Axis,
    ) -> Result<RasterImage> {
        if blend_width == 0 {
            return Err(StitchError::InvalidConfig(
                "blend_width must be at least 1".to_string(),
            ));
        }
        if frame_a.cross_extent(axis) != frame_b.cross_extent(axis) {
            return Err(StitchError::DimensionMismatch {
                axis,
                frame_index: 1,
                expected: frame_a.cross_extent(axis),
                found: frame_b.cross_extent(axis),
            });
        }
        let shortest = frame_a.extent(axis).min(frame_b.extent(axis));
        if overlap_size > shortest {
            return Err(StitchError::InvalidConfig(format!(
                "overlap of {} exceeds the shorter frame extent {}",
                overlap_size, shortest
            )));
        }
        if overlap_size == 0 {
            return RasterImage::concat(frame_a, frame_b, axis);
        }

        let blended = match axis {
            Axis::Vertical => self.blend_rows(frame_a, frame_b, overlap_size, blend_width)?,
            Axis::Horizontal => self.blend_columns(frame_a, frame_b, overlap_size, blend_width)?,
        };

        debug!(
            width = blended.width(),
            height = blended.height(),
            overlap_size,
            "Blended frame pair"
        );
        Ok(blended)
    }

    fn blend_rows(
        &self,
        frame_a: &RasterImage,
        frame_b: &RasterImage,
        overlap_size: usize,
        blend_width: usize,
    ) -> Result<RasterImage> {
        let width = frame_a.width();
        let stride = width * CHANNELS;
        let band_start = frame_a.height() - overlap_size;
        let height = frame_a.height() + frame_b.height() - overlap_size;

        let mut data = Vec::with_capacity(height * stride);
        data.extend_from_slice(&frame_a.data()[..band_start * stride]);
        for i in 0..overlap_size {
            let weights = blend_weights(i, overlap_size, blend_width);
            mix_into(&mut data, frame_a.row(band_start + i), frame_b.row(i), weights);
        }
        // B's remainder starts right after the band, no band line is rewritten
        data.extend_from_slice(&frame_b.data()[overlap_size * stride..]);

        RasterImage::new(width, height, data)
    }

    fn blend_columns(
        &self,
        frame_a: &RasterImage,
        frame_b: &RasterImage,
        overlap_size: usize,
        blend_width: usize,
    ) -> Result<RasterImage> {
        let height = frame_a.height();
        let band_start = frame_a.width() - overlap_size;
        let width = frame_a.width() + frame_b.width() - overlap_size;
        let weights: Vec<(f32, f32)> = (0..overlap_size)
            .map(|i| blend_weights(i, overlap_size, blend_width))
            .collect();

        let mut data = Vec::with_capacity(height * width * CHANNELS);
        for row in 0..height {
            let row_a = frame_a.row(row);
            let row_b = frame_b.row(row);
            data.extend_from_slice(&row_a[..band_start * CHANNELS]);

            let band_a = row_a[band_start * CHANNELS..].chunks_exact(CHANNELS);
            let band_b = row_b[..overlap_size * CHANNELS].chunks_exact(CHANNELS);
            for ((pa, pb), &w) in band_a.zip(band_b).zip(&weights) {
                mix_into(&mut data, pa, pb, w);
            }

            data.extend_from_slice(&row_b[overlap_size * CHANNELS..]);
        }

        RasterImage::new(width, height, data)
    }
}

impl Default for SeamBlender {
    fn default() -> Self {
        Self::new()
    }
}
