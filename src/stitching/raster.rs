//! Raster buffer module
//!
//! In-memory 8-bit, three-channel pixel grids and read-only views into them.

pub mod types;
mod band;

pub use band::Band;
pub use types::{Axis, RasterImage, CHANNELS};
