use std::path::Path;

use crate::frame_io::image_codec::{ImageFrameReader, ImageFrameWriter};
use crate::frame_io::reader::FrameReader;
use crate::frame_io::tiff_reader::TiffFrameReader;
use crate::frame_io::tiff_writer::{FrameCompression, TiffFrameWriter};
use crate::frame_io::writer::FrameWriter;
use crate::stitching::{RasterImage, Result, StitchError};

/// On-disk frame formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Tiff,
    Png,
    Jpeg,
}

impl FrameFormat {
    pub const EXTENSIONS: [(&'static str, FrameFormat); 5] = [
        ("tif", FrameFormat::Tiff),
        ("tiff", FrameFormat::Tiff),
        ("png", FrameFormat::Png),
        ("jpg", FrameFormat::Jpeg),
        ("jpeg", FrameFormat::Jpeg),
    ];

    /// Format named by the path's extension, case-insensitive.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::EXTENSIONS
            .iter()
            .find(|(known, _)| ext.eq_ignore_ascii_case(known))
            .map(|&(_, format)| format)
    }
}

/// Picks the encoder for `path` from its extension. `compression` only
/// applies to TIFF output.
pub fn frame_writer_for_path<P: AsRef<Path>>(
    path: P,
    compression: FrameCompression,
) -> Result<Box<dyn FrameWriter>> {
    let path = path.as_ref();
    match FrameFormat::from_path(path) {
        Some(FrameFormat::Tiff) => Ok(Box::new(TiffFrameWriter::new(compression))),
        Some(FrameFormat::Png) => Ok(Box::new(ImageFrameWriter::png())),
        Some(FrameFormat::Jpeg) => Ok(Box::new(ImageFrameWriter::jpeg())),
        None => Err(StitchError::UnsupportedFormat(format!(
            "{}: output must end in .tif, .tiff, .png, .jpg or .jpeg",
            path.display()
        ))),
    }
}

/// Reader for mixed directories: TIFF bytes go to the `tiff` decoder, the
/// rest to the `image` crate.
pub struct AutoFrameReader;

impl AutoFrameReader {
    fn is_tiff(data: &[u8]) -> bool {
        data.starts_with(b"II*\0") || data.starts_with(b"MM\0*")
    }
}

impl FrameReader for AutoFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<RasterImage> {
        if Self::is_tiff(data) {
            TiffFrameReader.read_frame(data)
        } else {
            ImageFrameReader.read_frame(data)
        }
    }
}
