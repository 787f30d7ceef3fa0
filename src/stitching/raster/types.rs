//! Raster image types

use std::fmt;
use std::str::FromStr;

use crate::stitching::common::error::{Result, StitchError};
use crate::stitching::raster::band::Band;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

/// Direction along which consecutive frames are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Top-to-bottom, bands are full-width rows
    #[default]
    Vertical,
    /// Left-to-right, bands are full-height columns
    Horizontal,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Vertical => f.write_str("vertical"),
            Axis::Horizontal => f.write_str("horizontal"),
        }
    }
}

impl FromStr for Axis {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Axis::Vertical),
            "horizontal" => Ok(Axis::Horizontal),
            other => Err(StitchError::InvalidConfig(format!(
                "unrecognized axis '{other}', expected 'vertical' or 'horizontal'"
            ))),
        }
    }
}

/// Number of samples in a `width` x `height` buffer with `channels` per pixel.
///
/// Fails with `InvalidDimensions` when either side is zero or the product
/// does not fit in `usize`.
pub fn sample_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(StitchError::InvalidDimensions(width, height));
    }
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or(StitchError::InvalidDimensions(width, height))
}

/// Owned 8-bit pixel grid with interleaved channels, row-major.
///
/// Channel order is whatever the producer used; the stitching engine only
/// treats a pixel as an ordered triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wraps an existing buffer, validating its size against the dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = sample_len(width, height, CHANNELS)?;
        if data.len() != expected {
            return Err(StitchError::BufferSizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn filled(width: usize, height: usize, pixel: [u8; CHANNELS]) -> Result<Self> {
        sample_len(width, height, CHANNELS)?;
        let data = pixel.repeat(width * height);
        Ok(Self { width, height, data })
    }

    /// Builds an image by evaluating `f(row, col)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> [u8; CHANNELS],
    {
        let mut data = Vec::with_capacity(sample_len(width, height, CHANNELS)?);
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(&f(row, col));
            }
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Size along the stitching axis.
    pub fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    /// Size across the stitching axis; must agree between frames being joined.
    pub fn cross_extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::Vertical => self.width,
            Axis::Horizontal => self.height,
        }
    }

    pub(crate) fn row_stride(&self) -> usize {
        self.width * CHANNELS
    }

    /// Interleaved samples of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[u8] {
        let stride = self.row_stride();
        &self.data[row * stride..(row + 1) * stride]
    }

    /// # Panics
    ///
    /// Panics if the coordinate is outside the image.
    pub fn pixel(&self, row: usize, col: usize) -> [u8; CHANNELS] {
        assert!(row < self.height && col < self.width, "pixel ({row}, {col}) out of bounds");
        let idx = (row * self.width + col) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Borrowed view of `len` lines starting at `start` along `axis`.
    pub fn band(&self, axis: Axis, start: usize, len: usize) -> Result<Band<'_>> {
        let extent = self.extent(axis);
        let end = start
            .checked_add(len)
            .filter(|&end| end <= extent)
            .ok_or(StitchError::RegionOutOfBounds { start, len, extent })?;

        Ok(match axis {
            Axis::Vertical => Band::new(self, start..end, 0..self.width),
            Axis::Horizontal => Band::new(self, 0..self.height, start..end),
        })
    }

    /// Copy of the image without `top` leading and `bottom` trailing rows.
    pub fn crop_rows(&self, top: usize, bottom: usize) -> Result<RasterImage> {
        let removed = top.saturating_add(bottom);
        if removed >= self.height {
            return Err(StitchError::InvalidDimensions(
                self.width,
                self.height.saturating_sub(removed),
            ));
        }
        let stride = self.row_stride();
        let data = self.data[top * stride..(self.height - bottom) * stride].to_vec();
        RasterImage::new(self.width, self.height - removed, data)
    }

    /// Appends `b` after `a` along `axis` with no overlap.
    pub fn concat(a: &RasterImage, b: &RasterImage, axis: Axis) -> Result<RasterImage> {
        if a.cross_extent(axis) != b.cross_extent(axis) {
            return Err(StitchError::DimensionMismatch {
                axis,
                frame_index: 1,
                expected: a.cross_extent(axis),
                found: b.cross_extent(axis),
            });
        }

        match axis {
            Axis::Vertical => {
                let mut data = Vec::with_capacity(a.data.len() + b.data.len());
                data.extend_from_slice(&a.data);
                data.extend_from_slice(&b.data);
                RasterImage::new(a.width, a.height + b.height, data)
            }
            Axis::Horizontal => {
                let mut data = Vec::with_capacity(a.data.len() + b.data.len());
                for row in 0..a.height {
                    data.extend_from_slice(a.row(row));
                    data.extend_from_slice(b.row(row));
                }
                RasterImage::new(a.width + b.width, a.height, data)
            }
        }
    }
}
