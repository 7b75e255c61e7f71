// src/removal/stitch.rs

//! Direct stitching: deletes whole rows/columns and closes the gap.
//!
//! Both entry points build a brand-new buffer from the source and leave the
//! source untouched; the caller swaps the result in once it is complete.

use bitvec::prelude::*;

use crate::image::buffer::{ImageBuffer, alloc_rows};
use crate::lines::line::Line;
use crate::utils::error::{DarkLineError, Result};

/// Row and column masks of everything a batch removes, in source coordinates.
#[derive(Clone, Debug)]
pub(crate) struct RemovalMasks {
    pub rows: BitVec,
    pub cols: BitVec,
}

/// Zeroed mask of `len` bits; storage is reserved fallibly.
fn alloc_mask(len: usize) -> Result<BitVec> {
    let words = len.div_ceil(usize::BITS as usize);
    let mut storage: Vec<usize> = Vec::new();
    storage.try_reserve_exact(words)?;
    storage.resize(words, 0);
    let mut mask = BitVec::from_vec(storage);
    mask.truncate(len);
    Ok(mask)
}

impl RemovalMasks {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(RemovalMasks {
            rows: alloc_mask(rows)?,
            cols: alloc_mask(cols)?,
        })
    }

    /// Marks the band of a line that already fits the mask dimensions.
    pub fn mark(&mut self, line: &Line) {
        let mask = if line.is_vertical {
            &mut self.cols
        } else {
            &mut self.rows
        };
        mask[line.position()..line.end()].fill(true);
    }

    pub fn from_lines<'a, I>(rows: usize, cols: usize, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Line>,
    {
        let mut masks = Self::new(rows, cols)?;
        for line in lines {
            masks.mark(line);
        }
        Ok(masks)
    }

    pub fn removed_rows(&self) -> usize {
        self.rows.count_ones()
    }

    pub fn removed_cols(&self) -> usize {
        self.cols.count_ones()
    }

    /// Final dimensions, or `DegenerateResult` if either would reach zero.
    pub fn remaining(&self) -> Result<(usize, usize)> {
        let rows = self.rows.len() - self.removed_rows();
        let cols = self.cols.len() - self.removed_cols();
        if rows == 0 || cols == 0 {
            return Err(DarkLineError::DegenerateResult {
                rows: self.rows.len(),
                cols: self.cols.len(),
                removed_rows: self.removed_rows(),
                removed_cols: self.removed_cols(),
            });
        }
        Ok((rows, cols))
    }
}

/// Removes a single line from `src`.
pub(crate) fn stitch_line(src: &ImageBuffer, line: &Line) -> Result<ImageBuffer> {
    if !line.fits(src.rows(), src.cols()) {
        return Err(DarkLineError::InvalidLineSelection(format!(
            "{} does not fit a {}x{} image",
            line,
            src.rows(),
            src.cols()
        )));
    }
    let (start, end) = (line.position(), line.end());

    if line.is_vertical {
        let new_cols = src.cols() - line.width;
        if new_cols == 0 {
            return Err(DarkLineError::DegenerateResult {
                rows: src.rows(),
                cols: src.cols(),
                removed_rows: 0,
                removed_cols: line.width,
            });
        }
        let mut data = alloc_rows(src.rows())?;
        for row in src.row_slices() {
            let mut out = Vec::new();
            out.try_reserve_exact(new_cols)?;
            out.extend_from_slice(&row[..start]);
            out.extend_from_slice(&row[end..]);
            data.push(out);
        }
        ImageBuffer::from_rows(data)
    } else {
        let new_rows = src.rows() - line.width;
        if new_rows == 0 {
            return Err(DarkLineError::DegenerateResult {
                rows: src.rows(),
                cols: src.cols(),
                removed_rows: line.width,
                removed_cols: 0,
            });
        }
        let mut data = alloc_rows(new_rows)?;
        for (y, row) in src.row_slices().iter().enumerate() {
            if (start..end).contains(&y) {
                continue;
            }
            let mut out = Vec::new();
            out.try_reserve_exact(src.cols())?;
            out.extend_from_slice(row);
            data.push(out);
        }
        ImageBuffer::from_rows(data)
    }
}

/// Builds the compacted image in one pass, skipping every masked row and column.
pub(crate) fn stitch_masked(src: &ImageBuffer, masks: &RemovalMasks) -> Result<ImageBuffer> {
    let (new_rows, new_cols) = masks.remaining()?;
    let mut data = alloc_rows(new_rows)?;
    for (row, _) in src
        .row_slices()
        .iter()
        .zip(masks.rows.iter())
        .filter(|(_, removed)| !**removed)
    {
        let mut out = Vec::new();
        out.try_reserve_exact(new_cols)?;
        out.extend(
            row.iter()
                .zip(masks.cols.iter())
                .filter(|(_, removed)| !**removed)
                .map(|(&v, _)| v),
        );
        data.push(out);
    }
    ImageBuffer::from_rows(data)
}
