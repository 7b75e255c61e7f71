// src/lines/params.rs

use crate::lines::line::MIN_LINE_WIDTH;
use crate::utils::error::{DarkLineError, Result};

/// Samples at or below this count as dark during the scan.
pub const BLACK_THRESHOLD: f64 = 1000.0;
/// Fraction of a row/column allowed to be non-dark.
pub const NOISE_TOLERANCE: f64 = 0.1;
/// Neighbours below this mark a line as sitting inside an object.
pub const WHITE_THRESHOLD: f64 = 55000.0;
/// Columns sampled on each side of a vertical line.
pub const VERTICAL_CHECK_RANGE: usize = 3;
/// Rows sampled on each side of a horizontal line.
pub const HORIZONTAL_CHECK_RANGE: usize = 2;
/// Target number of sample points across a horizontal line.
pub const HORIZONTAL_SAMPLE_POINTS: usize = 10;

/// Parameters for scanning and classification.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionParams {
    pub black_threshold: f64,
    pub noise_tolerance: f64,
    pub white_threshold: f64,
    pub vertical_check_range: usize,
    pub horizontal_check_range: usize,
    pub min_line_width: usize,
    /// Worker count for the scan; `None` uses the hardware concurrency.
    pub workers: Option<usize>,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            black_threshold: BLACK_THRESHOLD,
            noise_tolerance: NOISE_TOLERANCE,
            white_threshold: WHITE_THRESHOLD,
            vertical_check_range: VERTICAL_CHECK_RANGE,
            horizontal_check_range: HORIZONTAL_CHECK_RANGE,
            min_line_width: MIN_LINE_WIDTH,
            workers: None,
        }
    }
}

impl DetectionParams {
    pub fn with_black_threshold(mut self, threshold: f64) -> Self {
        self.black_threshold = threshold;
        self
    }

    pub fn with_noise_tolerance(mut self, tolerance: f64) -> Self {
        self.noise_tolerance = tolerance;
        self
    }

    pub fn with_white_threshold(mut self, threshold: f64) -> Self {
        self.white_threshold = threshold;
        self
    }

    pub fn with_min_line_width(mut self, width: usize) -> Self {
        self.min_line_width = width;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Resolved worker count, never below one.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.noise_tolerance) {
            return Err(DarkLineError::InvalidInput(format!(
                "noise tolerance {} must be in [0, 1)",
                self.noise_tolerance
            )));
        }
        if self.min_line_width == 0 {
            return Err(DarkLineError::InvalidInput(
                "minimum line width must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(DarkLineError::InvalidInput(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pixels on a line at or below this are treated as defective.
pub const MIN_BRIGHTNESS: f64 = 1000.0;
pub const MIN_SEARCH_RADIUS: usize = 10;
pub const MAX_SEARCH_RADIUS: usize = 200;

/// Parameters for neighbour-value infill.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovalParams {
    pub min_brightness: f64,
    pub min_search_radius: usize,
    pub max_search_radius: usize,
}

impl Default for RemovalParams {
    fn default() -> Self {
        Self {
            min_brightness: MIN_BRIGHTNESS,
            min_search_radius: MIN_SEARCH_RADIUS,
            max_search_radius: MAX_SEARCH_RADIUS,
        }
    }
}

impl RemovalParams {
    pub fn with_min_brightness(mut self, brightness: f64) -> Self {
        self.min_brightness = brightness;
        self
    }

    pub fn with_search_radius(mut self, min: usize, max: usize) -> Self {
        self.min_search_radius = min;
        self.max_search_radius = max;
        self
    }

    /// `clamp(width * 2, min, max)`.
    pub fn search_radius(&self, width: usize) -> usize {
        width
            .saturating_mul(2)
            .clamp(self.min_search_radius, self.max_search_radius)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_search_radius == 0 || self.min_search_radius > self.max_search_radius {
            return Err(DarkLineError::InvalidInput(format!(
                "search radius range {}..={} is empty",
                self.min_search_radius, self.max_search_radius
            )));
        }
        Ok(())
    }
}
