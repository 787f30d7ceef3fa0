//! Scroll-capture stitching module
//!
//! This module joins a sequence of adjacent frames into one composite,
//! with separate modules for overlap detection, seam refinement, seam
//! blending, chrome-band removal and the orchestrating pipeline.

pub mod common;
pub mod raster;
pub mod config;
pub mod chrome;
pub mod overlap;
pub mod seam;
pub mod pipeline;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests;

pub use common::{
    StitchError,
    Result,
};

pub use raster::{
    Axis,
    Band,
    RasterImage,
    CHANNELS,
};

pub use config::{
    StitchConfig,
    StitchConfigBuilder,
};

pub use chrome::{
    ChromeBandDetector,
    ChromeBands,
};

pub use overlap::{
    OverlapDetector,
    OverlapResult,
};

pub use seam::{
    SeamBlender,
    SeamRefiner,
};

pub use pipeline::{
    PipelineState,
    StitchPipeline,
};

pub use report::{
    FoldMode,
    FoldRecord,
    StepTiming,
    StitchReport,
    Timer,
};
