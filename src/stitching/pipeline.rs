use std::borrow::Cow;

use tracing::{debug, info, instrument, warn};

use crate::stitching::{
    chrome::ChromeBandDetector,
    common::error::{Result, StitchError},
    config::StitchConfig,
    overlap::{OverlapDetector, OverlapResult, DEFAULT_SEARCH_STRIDE},
    raster::{Axis, RasterImage},
    report::{FoldMode, FoldRecord, StitchReport, Timer},
    seam::{SeamBlender, SeamRefiner},
};

/// Where a pipeline is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Cropping,
    Folding { completed: usize, total: usize },
    Done,
    Failed,
}

/// Folds an ordered frame sequence into a single composite.
///
/// Frames are borrowed and never modified; every fold allocates a fresh
/// composite that replaces the previous one.
pub struct StitchPipeline {
    config: StitchConfig,
    chrome: ChromeBandDetector,
    detector: OverlapDetector,
    refiner: SeamRefiner,
    blender: SeamBlender,
    state: PipelineState,
}

impl StitchPipeline {
    pub fn new(config: StitchConfig) -> Result<Self> {
        let detector = OverlapDetector::with_search(config.min_overlap, DEFAULT_SEARCH_STRIDE);
        Self::with_components(config, ChromeBandDetector::new(), detector, SeamRefiner::new())
    }

    /// Builds a pipeline around caller-supplied components. The detector's
    /// stride is kept, its overlap floor always follows `config.min_overlap`.
    pub fn with_components(
        config: StitchConfig,
        chrome: ChromeBandDetector,
        detector: OverlapDetector,
        refiner: SeamRefiner,
    ) -> Result<Self> {
        config.validate()?;
        let detector = OverlapDetector::with_search(config.min_overlap, detector.stride());
        Ok(Self {
            config,
            chrome,
            detector,
            refiner,
            blender: SeamBlender::new(),
            state: PipelineState::Idle,
        })
    }

    pub fn stitch(&mut self, frames: &[RasterImage]) -> Result<RasterImage> {
        self.stitch_with_report(frames).map(|(composite, _)| composite)
    }

    /// Runs the pipeline. On any error the run is abandoned and no partial
    /// composite is returned.
    #[instrument(skip(self, frames), fields(frames = frames.len(), axis = %self.config.axis))]
    pub fn stitch_with_report(&mut self, frames: &[RasterImage]) -> Result<(RasterImage, StitchReport)> {
        self.state = PipelineState::Idle;
        let result = self.run(frames);
        self.state = match &result {
            Ok(_) => PipelineState::Done,
            Err(e) => {
                warn!("Stitching failed: {}", e);
                PipelineState::Failed
            }
        };
        result
    }

    fn run(&mut self, frames: &[RasterImage]) -> Result<(RasterImage, StitchReport)> {
        if frames.len() < 2 {
            return Err(StitchError::InsufficientFrames { found: frames.len() });
        }
        info!("Starting stitch of {} frames", frames.len());

        let mut report = StitchReport::new();

        let frames: Vec<Cow<'_, RasterImage>> = if self.config.remove_chrome {
            self.state = PipelineState::Cropping;
            let timer = Timer::start("crop_chrome");
            let cropped = self.crop_frames(frames, &mut report);
            let (name, duration) = timer.stop();
            report.add_step(name, duration);
            cropped
        } else {
            frames.iter().map(Cow::Borrowed).collect()
        };

        self.validate_frames(&frames)?;

        let total = frames.len() - 1;
        self.state = PipelineState::Folding { completed: 0, total };

        let timer = Timer::start("fold_frames");
        let mut composite = frames[0].clone().into_owned();
        for (index, frame) in frames.iter().enumerate().skip(1) {
            let _span = tracing::debug_span!("fold", frame = index).entered();
            let (next, record) = self.fold(&composite, frame, index)?;
            composite = next;
            report.add_fold(record);
            self.state = PipelineState::Folding { completed: index, total };
        }
        let (name, duration) = timer.stop();
        report.add_step(name, duration);

        info!(
            width = composite.width(),
            height = composite.height(),
            "Stitch complete"
        );
        Ok((composite, report))
    }

    fn crop_frames<'a>(&self, frames: &'a [RasterImage], report: &mut StitchReport) -> Vec<Cow<'a, RasterImage>> {
        if self.config.axis != Axis::Vertical {
            warn!("Chrome removal only applies to vertical stitching, skipping");
            return frames.iter().map(Cow::Borrowed).collect();
        }

        let mut bands = Vec::with_capacity(frames.len());
        let mut cropped = Vec::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            let detected = self.chrome.detect(
                frame,
                self.config.chrome_top_height,
                self.config.chrome_bottom_height,
            );
            debug!(
                frame = index,
                top = detected.top_height,
                bottom = detected.bottom_height,
                "Chrome classification"
            );
            cropped.push(self.chrome.crop(frame, detected));
            bands.push(detected);
        }
        report.set_chrome_bands(bands);
        cropped
    }

    fn validate_frames(&self, frames: &[Cow<'_, RasterImage>]) -> Result<()> {
        let axis = self.config.axis;
        let expected = frames[0].cross_extent(axis);
        for (frame_index, frame) in frames.iter().enumerate().skip(1) {
            let found = frame.cross_extent(axis);
            if found != expected {
                return Err(StitchError::DimensionMismatch {
                    axis,
                    frame_index,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    fn fold(
        &self,
        composite: &RasterImage,
        frame: &RasterImage,
        frame_index: usize,
    ) -> Result<(RasterImage, FoldRecord)> {
        let timer = Timer::start("fold");
        let axis = self.config.axis;

        let overlap = if self.config.auto_detect_overlap {
            self.detector.find_overlap(
                composite,
                frame,
                axis,
                self.config.similarity_threshold,
                self.config.max_overlap_ratio,
            )?
        } else {
            OverlapResult::none()
        };

        let mut seam_offset = None;
        let (joined, mode) = if overlap.is_found() {
            let mut overlap_size = overlap.overlap_size;
            if self.config.refine_seam {
                let offset = self.refiner.refine(composite, frame, overlap_size, axis)?;
                seam_offset = Some(offset);
                overlap_size -= offset;
            }
            debug!(overlap_size, confidence = overlap.confidence, "Blending frame");
            let blended = self.blender.blend(composite, frame, overlap_size, self.config.blend_width, axis)?;
            (blended, FoldMode::Blended)
        } else {
            debug!("No overlap, concatenating frame");
            (RasterImage::concat(composite, frame, axis)?, FoldMode::Concatenated)
        };

        let (_, duration) = timer.stop();
        Ok((
            joined,
            FoldRecord {
                frame_index,
                mode,
                overlap,
                seam_offset,
                duration,
            },
        ))
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: StitchConfig) -> Result<()> {
        config.validate()?;
        self.detector = OverlapDetector::with_search(config.min_overlap, self.detector.stride());
        self.config = config;
        self.state = PipelineState::Idle;
        Ok(())
    }
}
