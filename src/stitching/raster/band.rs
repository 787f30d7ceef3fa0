use std::ops::Range;

use crate::stitching::raster::types::{RasterImage, CHANNELS};

/// Read-only rectangular view into a [`RasterImage`].
///
/// A band is always a run of whole lines along the stitching axis, so its
/// pixels can be walked as one contiguous slice per image row.
#[derive(Debug, Clone)]
pub struct Band<'a> {
    image: &'a RasterImage,
    rows: Range<usize>,
    cols: Range<usize>,
}

impl<'a> Band<'a> {
    pub(crate) fn new(image: &'a RasterImage, rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { image, rows, cols }
    }

    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    pub fn cols(&self) -> Range<usize> {
        self.cols.clone()
    }

    pub fn pixel_count(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Interleaved samples of each covered row, top to bottom.
    pub fn segments(&self) -> impl Iterator<Item = &'a [u8]> {
        let image = self.image;
        let stride = image.row_stride();
        let start = self.cols.start * CHANNELS;
        let end = self.cols.end * CHANNELS;
        self.rows.clone().map(move |row| {
            let base = row * stride;
            &image.data()[base + start..base + end]
        })
    }

    /// Mean of the per-channel population variances of the band.
    ///
    /// Channels are measured separately, so a band filled with one color
    /// scores 0 whatever that color is.
    pub fn variance(&self) -> f64 {
        let n = self.pixel_count() as f64;
        if n == 0.0 {
            return 0.0;
        }

        let mut sums = [(0.0f64, 0.0f64); CHANNELS];
        for segment in self.segments() {
            for pixel in segment.chunks_exact(CHANNELS) {
                for ((sum, sum_sq), &v) in sums.iter_mut().zip(pixel) {
                    let v = v as f64;
                    *sum += v;
                    *sum_sq += v * v;
                }
            }
        }

        let total: f64 = sums
            .iter()
            .map(|&(sum, sum_sq)| {
                let mean = sum / n;
                (sum_sq / n - mean * mean).max(0.0)
            })
            .sum();
        total / CHANNELS as f64
    }
}

#[cfg(test)]
mod tests {
    use crate::stitching::raster::types::{Axis, RasterImage};

    #[test]
    fn test_horizontal_band_segments() {
        let image = RasterImage::from_fn(5, 2, |r, c| [(r * 10 + c) as u8; 3]).unwrap();
        let band = image.band(Axis::Horizontal, 3, 2).unwrap();
        let segments: Vec<&[u8]> = band.segments().collect();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], &[3, 3, 3, 4, 4, 4]);
        assert_eq!(segments[1], &[13, 13, 13, 14, 14, 14]);
    }

    #[test]
    fn test_variance() {
        let uniform = RasterImage::filled(8, 8, [40, 40, 40]).unwrap();
        assert_eq!(uniform.band(Axis::Vertical, 0, 8).unwrap().variance(), 0.0);

        // half 0, half 100 => mean 50, variance 2500
        let split = RasterImage::from_fn(2, 2, |_, c| if c == 0 { [0; 3] } else { [100; 3] }).unwrap();
        let variance = split.band(Axis::Vertical, 0, 2).unwrap().variance();
        assert!((variance - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_color_has_zero_variance() {
        let orange = RasterImage::filled(6, 4, [255, 122, 0]).unwrap();
        assert_eq!(orange.band(Axis::Vertical, 0, 4).unwrap().variance(), 0.0);

        // only the red channel varies: (2500 + 0 + 0) / 3
        let red_split = RasterImage::from_fn(2, 2, |_, c| if c == 0 { [0, 7, 9] } else { [100, 7, 9] }).unwrap();
        let variance = red_split.band(Axis::Vertical, 0, 2).unwrap().variance();
        assert!((variance - 2500.0 / 3.0).abs() < 1e-9);
    }
}
