use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use scroll_stitch_rs::frame_io::{self, AutoFrameReader, FrameCompression};
use scroll_stitch_rs::logger;
use scroll_stitch_rs::stitching::{Axis, StitchConfig, StitchPipeline};

use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDirection {
    Vertical,
    Horizontal,
}

impl From<CliDirection> for Axis {
    fn from(direction: CliDirection) -> Self {
        match direction {
            CliDirection::Vertical => Axis::Vertical,
            CliDirection::Horizontal => Axis::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCompression {
    None,
    Lzw,
    Deflate,
}

impl From<CliCompression> for FrameCompression {
    fn from(compression: CliCompression) -> Self {
        match compression {
            CliCompression::None => FrameCompression::None,
            CliCompression::Lzw => FrameCompression::Lzw,
            CliCompression::Deflate => FrameCompression::Deflate,
        }
    }
}

/// Stitch consecutive screenshots into one long image.
#[derive(Debug, Parser)]
#[command(name = "scroll-stitch")]
#[command(version)]
struct Cli {
    /// Directory holding the frames (TIFF, PNG or JPEG), stitched in file-name order.
    #[arg(long)]
    input_dir: PathBuf,

    /// Path of the composite to write; the extension picks the format.
    #[arg(long)]
    output: PathBuf,

    /// Stitching direction.
    #[arg(long, value_enum, default_value_t = CliDirection::Vertical)]
    direction: CliDirection,

    /// Detect repeated content between frames and blend across it.
    #[arg(long)]
    auto_detect: bool,

    /// Crop status and navigation bars before stitching.
    #[arg(long)]
    remove_navbar: bool,

    /// Estimated top bar height in pixels.
    #[arg(long, default_value_t = 44)]
    navbar_top_height: usize,

    /// Estimated bottom bar height in pixels.
    #[arg(long, default_value_t = 34)]
    navbar_bottom_height: usize,

    /// Similarity threshold, 0-1.
    #[arg(long, default_value_t = 0.8)]
    threshold: f64,

    /// Width of each fade ramp in pixels.
    #[arg(long, default_value_t = 50)]
    blend_width: usize,

    /// Largest searched overlap as a fraction of the shorter frame.
    #[arg(long, default_value_t = 0.3)]
    max_overlap_ratio: f64,

    /// Refine the seam with a pixel-difference search after detection.
    #[arg(long)]
    refine_seam: bool,

    /// Compression of a TIFF composite.
    #[arg(long, value_enum, default_value_t = CliCompression::None)]
    compression: CliCompression,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    let config = StitchConfig::builder()
        .axis(cli.direction.into())
        .auto_detect_overlap(cli.auto_detect)
        .remove_chrome(cli.remove_navbar)
        .chrome_top_height(cli.navbar_top_height)
        .chrome_bottom_height(cli.navbar_bottom_height)
        .similarity_threshold(cli.threshold)
        .blend_width(cli.blend_width)
        .max_overlap_ratio(cli.max_overlap_ratio)
        .refine_seam(cli.refine_seam)
        .build();
    let mut pipeline = StitchPipeline::new(config).context("invalid stitch options")?;
    let writer = frame_io::frame_writer_for_path(&cli.output, cli.compression.into())
        .context("unsupported output format")?;

    info!("Direction: {}", pipeline.config().axis);
    info!(
        "Overlap detection: {}",
        if pipeline.config().auto_detect_overlap {
            "enabled"
        } else {
            "disabled"
        }
    );

    let frames = frame_io::read_frames_from_dir(&cli.input_dir, &AutoFrameReader)
        .with_context(|| format!("failed to load frames from {}", cli.input_dir.display()))?;

    let (composite, report) = pipeline
        .stitch_with_report(&frames)
        .context("stitching failed")?;
    report.log_summary();

    frame_io::write_frame_to_file(&cli.output, &composite, writer.as_ref())
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        "Wrote {} ({}x{})",
        cli.output.display(),
        composite.width(),
        composite.height()
    );
    Ok(())
}
