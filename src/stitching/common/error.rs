use thiserror::Error;

use crate::stitching::raster::Axis;

#[derive(Error, Debug)]
pub enum StitchError {
    #[error("At least 2 frames are required to stitch, got {found}")]
    InsufficientFrames { found: usize },

    #[error("Frame {frame_index} has cross-axis size {found}, expected {expected} when stitching {axis}")]
    DimensionMismatch {
        axis: Axis,
        frame_index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {found} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, found: usize },

    #[error("Region [{start}, {start}+{len}) is outside an extent of {extent}")]
    RegionOutOfBounds { start: usize, len: usize, extent: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read input: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode frame: {0}")]
    DecodeError(String),

    #[error("Failed to encode frame: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StitchError>;
