use std::io::Write;

use crate::stitching::{RasterImage, Result};

pub trait FrameWriter {
    fn write_frame(&self, image: &RasterImage, output: &mut dyn Write) -> Result<()>;
}
