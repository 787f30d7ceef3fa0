//! Frame reader backed by the `tiff` crate.
//!
//! Screenshots are usually 8-bit RGB or RGBA; grayscale captures are widened
//! to three identical channels so every frame reaches the stitcher in the
//! same layout.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::frame_io::reader::FrameReader;
use crate::stitching::raster::types::sample_len;
use crate::stitching::{RasterImage, Result, StitchError, CHANNELS};

pub struct TiffFrameReader;

impl FrameReader for TiffFrameReader {
    /// Decodes an 8-bit Gray, RGB or RGBA TIFF. Alpha is discarded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use scroll_stitch_rs::frame_io::{FrameReader, TiffFrameReader};
    ///
    /// let bytes = std::fs::read("frame_000.tiff").unwrap();
    /// let frame = TiffFrameReader.read_frame(&bytes).unwrap();
    /// ```
    fn read_frame(&self, data: &[u8]) -> Result<RasterImage> {
        debug!("Decoding TIFF frame, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| StitchError::DecodeError(e.to_string()))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| StitchError::DecodeError(e.to_string()))?;
        let color_type = decoder
            .colortype()
            .map_err(|e| StitchError::DecodeError(e.to_string()))?;

        let source_channels = match color_type {
            ColorType::Gray(8) => 1,
            ColorType::RGB(8) => 3,
            ColorType::RGBA(8) => 4,
            other => {
                return Err(StitchError::UnsupportedFormat(format!(
                    "{other:?} (expected 8-bit Gray, RGB or RGBA)"
                )));
            }
        };

        let (width, height) = (width as usize, height as usize);
        let expected = sample_len(width, height, source_channels)?;
        // the widened buffer must fit too
        sample_len(width, height, CHANNELS)?;

        let samples = match decoder
            .read_image()
            .map_err(|e| StitchError::DecodeError(e.to_string()))?
        {
            DecodingResult::U8(samples) => samples,
            _ => {
                return Err(StitchError::UnsupportedFormat(
                    "non 8-bit sample data".to_string(),
                ));
            }
        };

        if samples.len() != expected {
            return Err(StitchError::DecodeError(format!(
                "decoded {} samples, expected {}",
                samples.len(),
                expected
            )));
        }

        let data = match source_channels {
            3 => samples,
            1 => samples.iter().flat_map(|&v| [v; CHANNELS]).collect(),
            _ => samples
                .chunks_exact(source_channels)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        };

        debug!("Decoded frame: {}x{} from {:?}", width, height, color_type);
        RasterImage::new(width, height, data)
    }
}
