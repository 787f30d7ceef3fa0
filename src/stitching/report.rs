use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

use crate::stitching::chrome::ChromeBands;
use crate::stitching::overlap::OverlapResult;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// How a frame was joined onto the running composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldMode {
    Blended,
    Concatenated,
}

#[derive(Debug, Clone)]
pub struct FoldRecord {
    /// Index of the frame appended in this fold
    pub frame_index: usize,
    pub mode: FoldMode,
    /// Overlap search outcome; `none()` when detection is disabled
    pub overlap: OverlapResult,
    /// Refined seam offset, when refinement ran
    pub seam_offset: Option<usize>,
    pub duration: Duration,
}

impl FoldRecord {
    /// Overlap actually used for the blend.
    pub fn effective_overlap(&self) -> usize {
        match self.mode {
            FoldMode::Concatenated => 0,
            FoldMode::Blended => self.overlap.overlap_size - self.seam_offset.unwrap_or(0),
        }
    }
}

/// What happened during one stitch run.
#[derive(Debug, Default)]
pub struct StitchReport {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
    folds: Vec<FoldRecord>,
    chrome_bands: Vec<ChromeBands>,
}

impl StitchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        self.steps.push(StepTiming {
            name: name.clone(),
            duration,
        });
        *self.step_map.entry(name).or_insert(Duration::ZERO) += duration;
    }

    pub(crate) fn add_fold(&mut self, record: FoldRecord) {
        self.folds.push(record);
    }

    pub(crate) fn set_chrome_bands(&mut self, bands: Vec<ChromeBands>) {
        self.chrome_bands = bands;
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn folds(&self) -> &[FoldRecord] {
        &self.folds
    }

    /// Detected bands per input frame; empty when chrome removal did not run.
    pub fn chrome_bands(&self) -> &[ChromeBands] {
        &self.chrome_bands
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            info!(
                "{:<20} {:>10.3}ms ({:>5.1}%)",
                step.name,
                step.duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        for fold in &self.folds {
            info!(
                frame = fold.frame_index,
                mode = ?fold.mode,
                overlap = fold.effective_overlap(),
                confidence = fold.overlap.confidence,
                "Fold"
            );
        }
        info!("{:<20} {:>10.3}ms", "Total", total.as_secs_f64() * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}
