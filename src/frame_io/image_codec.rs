//! PNG and JPEG frames through the `image` crate.
//!
//! Phone screenshots are almost always PNG, so this pair sits next to the
//! TIFF reader and writer. Decoded frames are converted to 8-bit RGB; alpha
//! and extra bit depth are dropped.

use std::io::{Cursor, Write};

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::debug;

use crate::frame_io::reader::FrameReader;
use crate::frame_io::writer::FrameWriter;
use crate::stitching::{RasterImage, Result, StitchError};

/// Decodes any format the `image` crate recognizes from the leading bytes.
pub struct ImageFrameReader;

impl FrameReader for ImageFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<RasterImage> {
        let format = image::guess_format(data)
            .map_err(|e| StitchError::UnsupportedFormat(e.to_string()))?;
        debug!("Decoding {:?} frame, {} bytes", format, data.len());

        let decoded = image::load_from_memory_with_format(data, format)
            .map_err(|e| StitchError::DecodeError(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        RasterImage::new(width as usize, height as usize, rgb.into_raw())
    }
}

/// Encodes the composite as PNG or JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFrameWriter {
    format: ImageFormat,
}

impl ImageFrameWriter {
    pub fn png() -> Self {
        Self {
            format: ImageFormat::Png,
        }
    }

    pub fn jpeg() -> Self {
        Self {
            format: ImageFormat::Jpeg,
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl FrameWriter for ImageFrameWriter {
    fn write_frame(&self, image: &RasterImage, output: &mut dyn Write) -> Result<()> {
        debug!(
            "Encoding {:?} frame: {}x{}",
            self.format,
            image.width(),
            image.height()
        );

        let (width, height) = (
            u32::try_from(image.width()).map_err(|e| StitchError::EncodeError(e.to_string()))?,
            u32::try_from(image.height()).map_err(|e| StitchError::EncodeError(e.to_string()))?,
        );
        let rgb = RgbImage::from_raw(width, height, image.data().to_vec()).ok_or_else(|| {
            StitchError::EncodeError(format!("buffer does not match {}x{}", width, height))
        })?;

        // encoders need Seek, so go through memory
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut buffer), self.format)
            .map_err(|e| StitchError::EncodeError(e.to_string()))?;
        output.write_all(&buffer)?;

        debug!("{:?} encoding complete, {} bytes", self.format, buffer.len());
        Ok(())
    }
}
