//! Stitching configuration types

use crate::stitching::common::error::{Result, StitchError};
use crate::stitching::raster::Axis;

/// Configuration for one stitch run
#[derive(Debug, Clone, PartialEq)]
pub struct StitchConfig {
    /// Direction frames are joined in
    pub axis: Axis,
    /// Search for overlapping content between consecutive frames.
    /// When false every pair is concatenated as-is.
    pub auto_detect_overlap: bool,
    /// Crop status/navigation bars before stitching (vertical axis only)
    pub remove_chrome: bool,
    /// Estimated height of the top chrome band, in pixels
    pub chrome_top_height: usize,
    /// Estimated height of the bottom chrome band, in pixels
    pub chrome_bottom_height: usize,
    /// Minimum normalized correlation score for an overlap to be accepted
    pub similarity_threshold: f64,
    /// Width of each fade ramp at the overlap band edges
    pub blend_width: usize,
    /// Largest overlap searched, as a fraction of the shorter frame extent
    pub max_overlap_ratio: f64,
    /// Smallest overlap searched, in pixels
    pub min_overlap: usize,
    /// Run the SSD seam refinement after an overlap is found
    pub refine_seam: bool,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            auto_detect_overlap: true,
            remove_chrome: false,
            chrome_top_height: 44,
            chrome_bottom_height: 34,
            similarity_threshold: 0.8,
            blend_width: 50,
            max_overlap_ratio: 0.3,
            min_overlap: 50,
            refine_seam: false,
        }
    }
}

impl StitchConfig {
    pub fn builder() -> StitchConfigBuilder {
        StitchConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.blend_width == 0 {
            return Err(StitchError::InvalidConfig(
                "blend_width must be at least 1".to_string(),
            ));
        }

        if !self.similarity_threshold.is_finite() || !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(StitchError::InvalidConfig(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if !self.max_overlap_ratio.is_finite()
            || self.max_overlap_ratio <= 0.0
            || self.max_overlap_ratio > 1.0
        {
            return Err(StitchError::InvalidConfig(format!(
                "max_overlap_ratio must be within (0, 1], got {}",
                self.max_overlap_ratio
            )));
        }

        if self.min_overlap == 0 {
            return Err(StitchError::InvalidConfig(
                "min_overlap must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for StitchConfig
#[derive(Default)]
pub struct StitchConfigBuilder {
    axis: Option<Axis>,
    auto_detect_overlap: Option<bool>,
    remove_chrome: Option<bool>,
    chrome_top_height: Option<usize>,
    chrome_bottom_height: Option<usize>,
    similarity_threshold: Option<f64>,
    blend_width: Option<usize>,
    max_overlap_ratio: Option<f64>,
    min_overlap: Option<usize>,
    refine_seam: Option<bool>,
}

impl StitchConfigBuilder {
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn auto_detect_overlap(mut self, enable: bool) -> Self {
        self.auto_detect_overlap = Some(enable);
        self
    }

    pub fn remove_chrome(mut self, enable: bool) -> Self {
        self.remove_chrome = Some(enable);
        self
    }

    pub fn chrome_top_height(mut self, height: usize) -> Self {
        self.chrome_top_height = Some(height);
        self
    }

    pub fn chrome_bottom_height(mut self, height: usize) -> Self {
        self.chrome_bottom_height = Some(height);
        self
    }

    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn blend_width(mut self, width: usize) -> Self {
        self.blend_width = Some(width);
        self
    }

    pub fn max_overlap_ratio(mut self, ratio: f64) -> Self {
        self.max_overlap_ratio = Some(ratio);
        self
    }

    pub fn min_overlap(mut self, pixels: usize) -> Self {
        self.min_overlap = Some(pixels);
        self
    }

    pub fn refine_seam(mut self, enable: bool) -> Self {
        self.refine_seam = Some(enable);
        self
    }

    pub fn build(self) -> StitchConfig {
        let default = StitchConfig::default();
        StitchConfig {
            axis: self.axis.unwrap_or(default.axis),
            auto_detect_overlap: self.auto_detect_overlap.unwrap_or(default.auto_detect_overlap),
            remove_chrome: self.remove_chrome.unwrap_or(default.remove_chrome),
            chrome_top_height: self.chrome_top_height.unwrap_or(default.chrome_top_height),
            chrome_bottom_height: self.chrome_bottom_height.unwrap_or(default.chrome_bottom_height),
            similarity_threshold: self.similarity_threshold.unwrap_or(default.similarity_threshold),
            blend_width: self.blend_width.unwrap_or(default.blend_width),
            max_overlap_ratio: self.max_overlap_ratio.unwrap_or(default.max_overlap_ratio),
            min_overlap: self.min_overlap.unwrap_or(default.min_overlap),
            refine_seam: self.refine_seam.unwrap_or(default.refine_seam),
        }
    }
}
