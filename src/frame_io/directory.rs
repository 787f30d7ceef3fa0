use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::frame_io::format::FrameFormat;
use crate::frame_io::reader::FrameReader;
use crate::frame_io::writer::FrameWriter;
use crate::stitching::{RasterImage, Result, StitchError};

/// Frame files (TIFF, PNG or JPEG) directly inside `dir`, sorted by file name.
pub fn list_frame_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| StitchError::InputReadError(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && FrameFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Decodes every frame in `dir` in file-name order.
///
/// Files are decoded in parallel. A file that fails to decode is skipped with
/// a warning; finding no usable frame at all is an error.
#[instrument(skip(dir, reader), fields(dir = %dir.as_ref().display()))]
pub fn read_frames_from_dir<P, R>(dir: P, reader: &R) -> Result<Vec<RasterImage>>
where
    P: AsRef<Path>,
    R: FrameReader + Sync,
{
    let dir = dir.as_ref();
    let files = list_frame_files(dir)?;
    if files.is_empty() {
        return Err(StitchError::InputReadError(format!(
            "no frames found in {}",
            dir.display()
        )));
    }

    let decoded: Vec<Option<RasterImage>> = files
        .par_iter()
        .map(|path| {
            let frame = std::fs::read(path)
                .map_err(|e| StitchError::InputReadError(format!("{}: {}", path.display(), e)))
                .and_then(|bytes| reader.read_frame(&bytes));
            match frame {
                Ok(frame) => Some(frame),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    let frames: Vec<RasterImage> = decoded.into_iter().flatten().collect();
    if frames.is_empty() {
        return Err(StitchError::InputReadError(format!(
            "none of the {} files in {} could be decoded",
            files.len(),
            dir.display()
        )));
    }

    info!("Loaded {} frames", frames.len());
    Ok(frames)
}

pub fn write_frame_to_file<P, W>(path: P, image: &RasterImage, writer: &W) -> Result<()>
where
    P: AsRef<Path>,
    W: FrameWriter + ?Sized,
{
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)
        .map_err(|e| StitchError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
    writer.write_frame(image, &mut file)
}
