//! Dark-line removal.
//!
//! Two methods are available and exactly one applies to a whole call:
//!
//! - [`RemovalMethod::NeighborValues`] infills dark pixels on each selected
//!   line with the median of nearby bright pixels. Dimensions never change.
//! - [`RemovalMethod::DirectStitch`] deletes the selected rows/columns and
//!   shrinks the image. The registry handed to the remover is rebased to the
//!   new dimensions and loses the removed lines.
//!
//! Stitching never edits the caller's buffer in place: the new image is
//! built completely, then swapped in. Any failure leaves the input intact.

mod neighbor;
mod stitch;
pub mod summary;

use crate::image::buffer::ImageBuffer;
use crate::lines::line::{Line, LineSelection};
use crate::lines::params::RemovalParams;
use crate::lines::registry::{LineRegistry, rebase_line};
use crate::utils::error::{DarkLineError, Result};

use self::neighbor::infill_line;
use self::stitch::{RemovalMasks, stitch_line, stitch_masked};

pub use summary::{RemovalSummary, summarize};

/// How selected lines are removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemovalMethod {
    NeighborValues,
    DirectStitch,
}

/// What a removal call did.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovalOutcome {
    pub method: RemovalMethod,
    /// Lines that were removed, in the order applied and in the coordinates
    /// they had when the call started.
    pub removed: Vec<Line>,
    /// Selected lines that did not fit the buffer and were left alone.
    pub skipped: Vec<Line>,
    /// Pixels rewritten by neighbour infill. Always zero for stitching.
    pub pixels_replaced: usize,
    /// Dimensions when the call started.
    pub original_rows: usize,
    pub original_cols: usize,
    pub rows: usize,
    pub cols: usize,
}

impl RemovalOutcome {
    fn new(method: RemovalMethod, image: &ImageBuffer) -> Self {
        RemovalOutcome {
            method,
            removed: Vec::new(),
            skipped: Vec::new(),
            pixels_replaced: 0,
            original_rows: image.rows(),
            original_cols: image.cols(),
            rows: image.rows(),
            cols: image.cols(),
        }
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Final dimensions as (rows, cols).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when the image shrank during the call.
    pub fn dimensions_changed(&self) -> bool {
        (self.original_rows, self.original_cols) != (self.rows, self.cols)
    }
}

/// Vertical lines first, then horizontal, each by ascending coordinate.
fn removal_order(lines: &mut [Line]) {
    lines.sort_by_key(|l| (!l.is_vertical, l.position(), l.width));
}

/// Splits `lines` into those that fit the image and those that do not.
fn partition_valid(lines: Vec<Line>, image: &ImageBuffer) -> (Vec<Line>, Vec<Line>) {
    let (valid, skipped): (Vec<Line>, Vec<Line>) = lines
        .into_iter()
        .partition(|l| l.fits(image.rows(), image.cols()));
    for line in &skipped {
        log::warn!(
            "skipping {}: outside the current {}x{} image",
            line,
            image.rows(),
            image.cols()
        );
    }
    (valid, skipped)
}

/// Remover bound to a set of infill parameters.
#[derive(Clone, Debug, Default)]
pub struct LineRemover {
    params: RemovalParams,
}

impl LineRemover {
    pub fn new(params: RemovalParams) -> Self {
        LineRemover { params }
    }

    pub fn params(&self) -> &RemovalParams {
        &self.params
    }

    /// Removes every registry line whose classification matches `selection`.
    ///
    /// Stitching is done in a single pass over the union of all selected
    /// bands.
    pub fn remove_selective(
        &self,
        image: &mut ImageBuffer,
        registry: &mut LineRegistry,
        selection: LineSelection,
        method: RemovalMethod,
    ) -> Result<RemovalOutcome> {
        image.validate()?;
        self.params.validate()?;

        let targets: Vec<Line> = registry
            .iter()
            .filter(|l| selection.matches(l))
            .copied()
            .collect();
        let (mut valid, skipped) = partition_valid(targets, image);
        removal_order(&mut valid);

        let mut outcome = RemovalOutcome::new(method, image);
        outcome.skipped = skipped;

        match method {
            RemovalMethod::NeighborValues => {
                for line in &valid {
                    outcome.pixels_replaced += infill_line(image, line, &self.params)?;
                }
            }
            RemovalMethod::DirectStitch => {
                if valid.is_empty() {
                    return Ok(outcome);
                }
                let masks = RemovalMasks::from_lines(image.rows(), image.cols(), &valid)?;
                let stitched = stitch_masked(image, &masks)?;
                *image = stitched;
                registry.rebase(&masks.rows, &masks.cols, image.rows(), image.cols());
            }
        }

        outcome.removed = valid;
        outcome.rows = image.rows();
        outcome.cols = image.cols();
        log::debug!(
            "{:?}: removed {} lines, skipped {}, image now {}x{}",
            method,
            outcome.removed_count(),
            outcome.skipped_count(),
            outcome.rows,
            outcome.cols
        );
        Ok(outcome)
    }

    /// Removes an explicit list of lines one after another.
    ///
    /// `selected` is filtered by `selection`, validated against the current
    /// buffer, then applied vertical-first in ascending order. For stitching,
    /// each remaining line is shifted after every removal so its stored
    /// coordinates keep pointing at the same pixels. A single selected line
    /// that does not fit is an `InvalidLineSelection` error; in larger
    /// batches such lines are skipped and reported in the outcome.
    pub fn remove_sequential(
        &self,
        image: &mut ImageBuffer,
        registry: &mut LineRegistry,
        selected: &[Line],
        selection: LineSelection,
        method: RemovalMethod,
    ) -> Result<RemovalOutcome> {
        image.validate()?;
        self.params.validate()?;

        let candidates: Vec<Line> = selected
            .iter()
            .filter(|l| selection.matches(l))
            .copied()
            .collect();
        if let [line] = candidates.as_slice() {
            if !line.fits(image.rows(), image.cols()) {
                return Err(DarkLineError::InvalidLineSelection(format!(
                    "{} does not fit the current {}x{} image",
                    line,
                    image.rows(),
                    image.cols()
                )));
            }
        }
        let (mut valid, skipped) = partition_valid(candidates, image);
        removal_order(&mut valid);

        let mut outcome = RemovalOutcome::new(method, image);
        outcome.skipped = skipped;

        match method {
            RemovalMethod::NeighborValues => {
                for line in &valid {
                    outcome.pixels_replaced += infill_line(image, line, &self.params)?;
                }
                outcome.removed = valid;
            }
            RemovalMethod::DirectStitch => {
                let (rows, cols) = image.dimensions();
                // Reject the whole batch before touching anything.
                RemovalMasks::from_lines(rows, cols, &valid)?.remaining()?;

                let mut pending = valid.clone();
                let mut working: Option<ImageBuffer> = None;
                let mut applied = RemovalMasks::new(rows, cols)?;

                for i in 0..pending.len() {
                    let line = pending[i];
                    let next = {
                        let current = working.as_ref().unwrap_or(&*image);
                        if !line.fits(current.rows(), current.cols()) {
                            // Consumed by an overlapping line removed earlier.
                            log::warn!("skipping {}: already removed", valid[i]);
                            outcome.skipped.push(valid[i]);
                            continue;
                        }
                        stitch_line(current, &line)?
                    };
                    shift_pending(&mut pending[i + 1..], &line, next.rows(), next.cols())?;
                    applied.mark(&valid[i]);
                    outcome.removed.push(valid[i]);
                    working = Some(next);
                }

                if let Some(stitched) = working {
                    *image = stitched;
                    registry.rebase(&applied.rows, &applied.cols, image.rows(), image.cols());
                }
            }
        }

        outcome.rows = image.rows();
        outcome.cols = image.cols();
        log::debug!(
            "{:?} sequential: removed {} lines, skipped {}, image now {}x{}",
            method,
            outcome.removed_count(),
            outcome.skipped_count(),
            outcome.rows,
            outcome.cols
        );
        Ok(outcome)
    }
}

/// Rebases lines still waiting after `removed` was stitched out.
fn shift_pending(
    pending: &mut [Line],
    removed: &Line,
    new_rows: usize,
    new_cols: usize,
) -> Result<()> {
    let (old_rows, old_cols) = if removed.is_vertical {
        (new_rows, new_cols + removed.width)
    } else {
        (new_rows + removed.width, new_cols)
    };
    let mut band = RemovalMasks::new(old_rows, old_cols)?;
    band.mark(removed);
    for line in pending.iter_mut() {
        rebase_line(line, &band.rows, &band.cols, new_rows, new_cols);
    }
    Ok(())
}

/// Removes registry lines matching the flags using the default parameters.
pub fn remove_selective(
    image: &mut ImageBuffer,
    registry: &mut LineRegistry,
    remove_in_object: bool,
    remove_isolated: bool,
    method: RemovalMethod,
) -> Result<RemovalOutcome> {
    LineRemover::default().remove_selective(
        image,
        registry,
        LineSelection::new(remove_in_object, remove_isolated),
        method,
    )
}

/// Removes an explicit list of lines using the default parameters.
pub fn remove_sequential(
    image: &mut ImageBuffer,
    registry: &mut LineRegistry,
    selected: &[Line],
    remove_in_object: bool,
    remove_isolated: bool,
    method: RemovalMethod,
) -> Result<RemovalOutcome> {
    LineRemover::default().remove_sequential(
        image,
        registry,
        selected,
        LineSelection::new(remove_in_object, remove_isolated),
        method,
    )
}
