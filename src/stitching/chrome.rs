//! Fixed status/navigation bar detection.
//!
//! System chrome is drawn in a near-uniform color, so an edge band whose
//! per-channel variance stays under a fixed threshold is treated as chrome
//! and cropped before the frame is stitched.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::stitching::raster::{Axis, RasterImage};

/// Empirical variance ceiling for a band to count as chrome.
pub const DEFAULT_VARIANCE_THRESHOLD: f64 = 1000.0;

/// Heights of the chrome bands found at each edge of a frame. Zero means no chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeBands {
    pub top_height: usize,
    pub bottom_height: usize,
}

impl ChromeBands {
    pub fn is_empty(&self) -> bool {
        self.top_height == 0 && self.bottom_height == 0
    }
}

pub struct ChromeBandDetector {
    variance_threshold: f64,
}

impl Default for ChromeBandDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromeBandDetector {
    pub fn new() -> Self {
        Self {
            variance_threshold: DEFAULT_VARIANCE_THRESHOLD,
        }
    }

    pub fn with_variance_threshold(variance_threshold: f64) -> Self {
        Self { variance_threshold }
    }

    pub fn variance_threshold(&self) -> f64 {
        self.variance_threshold
    }

    /// Classifies the top and bottom edge bands independently.
    pub fn detect(
        &self,
        frame: &RasterImage,
        estimated_top_height: usize,
        estimated_bottom_height: usize,
    ) -> ChromeBands {
        let top_height = self
            .band_variance(frame, 0, estimated_top_height)
            .filter(|&variance| variance < self.variance_threshold)
            .map_or(0, |_| estimated_top_height);

        let bottom_start = frame.height().saturating_sub(estimated_bottom_height);
        let bottom_height = self
            .band_variance(frame, bottom_start, estimated_bottom_height)
            .filter(|&variance| variance < self.variance_threshold)
            .map_or(0, |_| estimated_bottom_height);

        debug!(top_height, bottom_height, "Detected chrome bands");
        ChromeBands {
            top_height,
            bottom_height,
        }
    }

    /// Removes the given bands, returning the frame untouched when nothing is cropped.
    pub fn crop<'a>(&self, frame: &'a RasterImage, bands: ChromeBands) -> Cow<'a, RasterImage> {
        if bands.is_empty() {
            return Cow::Borrowed(frame);
        }

        match frame.crop_rows(bands.top_height, bands.bottom_height) {
            Ok(cropped) => Cow::Owned(cropped),
            Err(e) => {
                warn!(
                    top = bands.top_height,
                    bottom = bands.bottom_height,
                    height = frame.height(),
                    "Chrome bands cover the whole frame, leaving it uncropped: {}",
                    e
                );
                Cow::Borrowed(frame)
            }
        }
    }

    fn band_variance(&self, frame: &RasterImage, start: usize, height: usize) -> Option<f64> {
        // Bands at least as tall as the frame are content, not chrome
        if height == 0 || height >= frame.height() {
            return None;
        }
        frame
            .band(Axis::Vertical, start, height)
            .ok()
            .map(|band| band.variance())
    }
}
