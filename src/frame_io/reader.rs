use crate::stitching::{RasterImage, Result};

pub trait FrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<RasterImage>;
}
