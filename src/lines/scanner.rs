// src/lines/scanner.rs

//! Finds maximal runs of predominantly dark rows and columns.
//!
//! The scan runs in two steps per axis:
//!
//! 1. **Flagging.** The column (or row) range is split into one contiguous
//!    chunk per worker. Each worker fills only its own slice of a shared
//!    `Vec<bool>`, so no locking is needed. All chunks finish before the
//!    flags are read.
//! 2. **Run collapse.** A single left-to-right pass turns the flags into
//!    `(start, width)` runs. A run still open at the last index is closed
//!    and emitted.
//!
//! Each run becomes a [`Line`], is classified, and is appended to the
//! registry. Vertical lines always come before horizontal ones.

use std::sync::{Mutex, PoisonError};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::image::buffer::ImageBuffer;
use crate::lines::classify::classify;
use crate::lines::line::{Line, Orientation, ScanOrientation};
use crate::lines::params::DetectionParams;
use crate::lines::registry::LineRegistry;
use crate::utils::error::Result;

/// Scanner bound to a set of detection parameters.
#[derive(Clone, Debug, Default)]
pub struct LineScanner {
    params: DetectionParams,
}

impl LineScanner {
    pub fn new(params: DetectionParams) -> Self {
        LineScanner { params }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Scans `image` and returns every classified line along the requested axes.
    pub fn scan(&self, image: &ImageBuffer, orientation: ScanOrientation) -> Result<LineRegistry> {
        image.validate()?;
        self.params.validate()?;

        let workers = self.params.worker_count();
        let sink = Mutex::new(LineRegistry::default());

        for axis in [Orientation::Vertical, Orientation::Horizontal] {
            if !orientation.includes(axis) {
                continue;
            }
            let flags = dark_flags(image, axis, &self.params, workers)?;
            let runs = collapse_runs(&flags, self.params.min_line_width);
            log::debug!(
                "{:?} scan over {}x{}: {} dark indices, {} runs",
                axis,
                image.rows(),
                image.cols(),
                flags.iter().filter(|&&f| f).count(),
                runs.len()
            );

            for (start, width) in runs {
                let mut line = match axis {
                    Orientation::Vertical => Line::vertical(start, width, image.rows()),
                    Orientation::Horizontal => Line::horizontal(start, width, image.cols()),
                };
                classify(image, &mut line, &self.params);
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(line)?;
            }
        }

        let registry = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        log::debug!(
            "scan found {} lines ({} in-object, {} isolated)",
            registry.len(),
            registry.count_in_object(),
            registry.count_isolated()
        );
        Ok(registry)
    }
}

/// Scans `image` with the default parameters.
pub fn scan(image: &ImageBuffer, orientation: ScanOrientation) -> Result<LineRegistry> {
    LineScanner::default().scan(image, orientation)
}

/// Whether `dark_count` of `total` samples clears the noise tolerance.
fn is_dark(dark_count: usize, total: usize, noise_tolerance: f64) -> bool {
    total > 0 && (dark_count as f64 / total as f64) > 1.0 - noise_tolerance
}

/// Computes the per-column (vertical) or per-row (horizontal) dark flags.
fn dark_flags(
    image: &ImageBuffer,
    axis: Orientation,
    params: &DetectionParams,
    workers: usize,
) -> Result<Vec<bool>> {
    let len = match axis {
        Orientation::Vertical => image.cols(),
        Orientation::Horizontal => image.rows(),
    };
    let mut flags = Vec::new();
    flags.try_reserve_exact(len)?;
    flags.resize(len, false);

    let chunk_len = len.div_ceil(workers).max(1);
    let fill = |(chunk_idx, chunk): (usize, &mut [bool])| -> Result<()> {
        let start = chunk_idx * chunk_len;
        match axis {
            Orientation::Vertical => flag_columns(image, start, chunk, params),
            Orientation::Horizontal => {
                flag_rows(image, start, chunk, params);
                Ok(())
            }
        }
    };

    #[cfg(feature = "rayon")]
    flags
        .par_chunks_mut(chunk_len)
        .enumerate()
        .try_for_each(fill)?;
    #[cfg(not(feature = "rayon"))]
    flags.chunks_mut(chunk_len).enumerate().try_for_each(fill)?;

    Ok(flags)
}

/// Flags columns `start..start + out.len()`.
fn flag_columns(
    image: &ImageBuffer,
    start: usize,
    out: &mut [bool],
    params: &DetectionParams,
) -> Result<()> {
    let end = start + out.len();
    let mut counts: Vec<usize> = Vec::new();
    counts.try_reserve_exact(out.len())?;
    counts.resize(out.len(), 0);
    for row in image.row_slices() {
        for (count, &v) in counts.iter_mut().zip(&row[start..end]) {
            if v <= params.black_threshold {
                *count += 1;
            }
        }
    }
    for (flag, count) in out.iter_mut().zip(counts) {
        *flag = is_dark(count, image.rows(), params.noise_tolerance);
    }
    Ok(())
}

/// Flags rows `start..start + out.len()`.
fn flag_rows(image: &ImageBuffer, start: usize, out: &mut [bool], params: &DetectionParams) {
    for (i, flag) in out.iter_mut().enumerate() {
        let dark = image
            .row(start + i)
            .iter()
            .filter(|&&v| v <= params.black_threshold)
            .count();
        *flag = is_dark(dark, image.cols(), params.noise_tolerance);
    }
}

/// Collapses consecutive `true` flags into `(start, width)` runs of at least `min_width`.
pub(crate) fn collapse_runs(flags: &[bool], min_width: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for (i, &dark) in flags.iter().enumerate() {
        match (dark, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                if i - start >= min_width {
                    runs.push((start, i - start));
                }
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        let width = flags.len() - start;
        if width >= min_width {
            runs.push((start, width));
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(rows: usize, cols: usize, dark_cols: &[usize]) -> Result<ImageBuffer> {
        ImageBuffer::from_fn(rows, cols, |_, x| {
            if dark_cols.contains(&x) { 0.0 } else { 65535.0 }
        })
    }

    #[test]
    fn test_collapse_runs_closes_trailing_run() {
        let flags = [false, true, true, false, true, true, true];
        assert_eq!(collapse_runs(&flags, 1), vec![(1, 2), (4, 3)]);
        assert_eq!(collapse_runs(&flags, 3), vec![(4, 3)]);
        assert!(collapse_runs(&[], 1).is_empty());
    }

    #[test]
    fn test_single_dark_column() -> Result<()> {
        let image = striped(16, 20, &[7])?;
        let registry = scan(&image, ScanOrientation::Vertical)?;
        assert_eq!(registry.len(), 1);
        let line = registry.lines()[0];
        assert!(line.is_vertical);
        assert_eq!((line.x, line.width), (7, 1));
        assert_eq!((line.start_y, line.end_y), (0, 15));
        assert!(!line.in_object);
        Ok(())
    }

    #[test]
    fn test_dark_run_touching_last_column() -> Result<()> {
        let image = striped(10, 12, &[9, 10, 11])?;
        let registry = scan(&image, ScanOrientation::Vertical)?;
        assert_eq!(registry.len(), 1);
        assert_eq!((registry.lines()[0].x, registry.lines()[0].width), (9, 3));
        Ok(())
    }

    #[test]
    fn test_noise_tolerance_boundary() -> Result<()> {
        // 9 of 10 dark is exactly 90%, which does not exceed the threshold.
        let mut image = striped(10, 5, &[2])?;
        image.set(0, 2, 65535.0);
        assert!(scan(&image, ScanOrientation::Vertical)?.is_empty());

        let image = striped(20, 5, &[2])?;
        let mut noisy = image.clone();
        noisy.set(0, 2, 65535.0);
        assert_eq!(scan(&noisy, ScanOrientation::Vertical)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_both_orders_vertical_first() -> Result<()> {
        let image = ImageBuffer::from_fn(12, 12, |y, x| {
            if x == 3 || y == 8 { 0.0 } else { 65535.0 }
        })?;
        let registry = scan(&image, ScanOrientation::Both)?;
        assert_eq!(registry.len(), 2);
        assert!(registry.lines()[0].is_vertical);
        assert_eq!(registry.lines()[0].x, 3);
        assert!(!registry.lines()[1].is_vertical);
        assert_eq!(registry.lines()[1].y, 8);

        let horizontal = scan(&image, ScanOrientation::Horizontal)?;
        assert_eq!(horizontal.len(), 1);
        assert!(!horizontal.lines()[0].is_vertical);
        Ok(())
    }

    #[test]
    fn test_worker_count_does_not_change_results() -> Result<()> {
        let image = ImageBuffer::from_fn(37, 53, |y, x| {
            if x % 7 == 0 || (y / 3) % 5 == 0 {
                0.0
            } else if (x + y) % 11 == 0 {
                20000.0
            } else {
                65535.0
            }
        })?;
        let baseline = LineScanner::new(DetectionParams::default().with_workers(1))
            .scan(&image, ScanOrientation::Both)?;
        assert!(!baseline.is_empty());
        for workers in [2, 3, 8, 64] {
            let other = LineScanner::new(DetectionParams::default().with_workers(workers))
                .scan(&image, ScanOrientation::Both)?;
            assert_eq!(baseline, other, "workers = {}", workers);
        }
        Ok(())
    }

    #[test]
    fn test_empty_image_is_invalid_input() -> Result<()> {
        let image = ImageBuffer::new(0, 0)?;
        assert!(matches!(
            scan(&image, ScanOrientation::Both),
            Err(crate::utils::error::DarkLineError::InvalidInput(_))
        ));
        Ok(())
    }
}
