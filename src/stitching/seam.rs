//! Seam handling module
//!
//! Refinement of the seam location inside a detected overlap, and the
//! cross-fade that joins two frames across it.

mod refiner;
mod blender;

pub use refiner::{SeamRefiner, DEFAULT_REFINE_STRIDE};
pub use blender::{SeamBlender, blend_weights};
