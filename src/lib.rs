pub mod stitching;
pub mod frame_io;
pub mod logger;
