//! Frame I/O module
//!
//! Decoding frames into [`RasterImage`](crate::stitching::RasterImage)s and
//! encoding the composite back out. The stitching engine never touches the
//! filesystem; this module is the collaborator that does.

mod reader;
mod writer;
mod tiff_reader;
mod tiff_writer;
mod image_codec;
mod format;
mod directory;

pub use reader::FrameReader;
pub use writer::FrameWriter;
pub use tiff_reader::TiffFrameReader;
pub use tiff_writer::{FrameCompression, TiffFrameWriter};
pub use image_codec::{ImageFrameReader, ImageFrameWriter};
pub use format::{frame_writer_for_path, AutoFrameReader, FrameFormat};
pub use directory::{list_frame_files, read_frames_from_dir, write_frame_to_file};
