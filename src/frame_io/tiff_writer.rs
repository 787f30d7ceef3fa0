use std::io::Write;

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{colortype, Compression, TiffEncoder};
use tracing::debug;

use crate::frame_io::writer::FrameWriter;
use crate::stitching::{RasterImage, Result, StitchError};

/// TIFF compression methods for the written composite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression, balanced level
    Deflate,
}

#[derive(Debug, Clone, Default)]
pub struct TiffFrameWriter {
    pub compression: FrameCompression,
}

impl TiffFrameWriter {
    pub fn new(compression: FrameCompression) -> Self {
        Self { compression }
    }
}

impl FrameWriter for TiffFrameWriter {
    fn write_frame(&self, image: &RasterImage, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding TIFF frame: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();

        let compression = match self.compression {
            FrameCompression::None => Compression::Uncompressed,
            FrameCompression::Lzw => Compression::Lzw,
            FrameCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| StitchError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<colortype::RGB8>(
                image.width() as u32,
                image.height() as u32,
                image.data(),
            )
            .map_err(|e| StitchError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
