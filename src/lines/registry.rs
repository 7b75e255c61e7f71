// src/lines/registry.rs

//! Ordered collection of detected lines between scan time and removal time.
//!
//! The registry keeps a 2D slot shape so it matches the other grid-shaped
//! collections callers keep around, but every constructor here produces
//! the degenerate `N x 1` shape. Storage is an owned `Vec`, released on
//! drop or explicitly through [`LineRegistry::destroy`].

use bitvec::prelude::*;

use crate::lines::line::{Line, Orientation};
use crate::utils::error::{DarkLineError, Result};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineRegistry {
    rows: usize,
    cols: usize,
    slots: Vec<Line>,
}

impl LineRegistry {
    /// Allocates `count` default-initialised slots. Zero gives an empty registry.
    pub fn create(count: usize) -> Result<Self> {
        if count == 0 {
            return Ok(Self::default());
        }
        Self::with_shape(count, 1)
    }

    /// Allocates a `rows x cols` grid of default slots.
    pub fn with_shape(rows: usize, cols: usize) -> Result<Self> {
        let total = rows.checked_mul(cols).ok_or_else(|| {
            DarkLineError::AllocationFailure(format!("{}x{} registry overflows", rows, cols))
        })?;
        if total == 0 {
            return Ok(Self::default());
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(total)?;
        slots.resize(total, Line::default());
        Ok(LineRegistry { rows, cols, slots })
    }

    /// Builds an `N x 1` registry from already classified lines.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let rows = lines.len();
        LineRegistry {
            rows,
            cols: if rows == 0 { 0 } else { 1 },
            slots: lines,
        }
    }

    /// Deep copy with fallible allocation.
    pub fn try_clone(&self) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(self.slots.len())?;
        slots.extend_from_slice(&self.slots);
        Ok(LineRegistry {
            rows: self.rows,
            cols: self.cols,
            slots,
        })
    }

    /// Releases all slot storage. Safe to call any number of times.
    pub fn destroy(&mut self) {
        self.slots = Vec::new();
        self.rows = 0;
        self.cols = 0;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Line> {
        if row < self.rows && col < self.cols {
            self.slots.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, line: Line) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(DarkLineError::InvalidInput(format!(
                "slot ({}, {}) outside a {}x{} registry",
                row, col, self.rows, self.cols
            )));
        }
        self.slots[row * self.cols + col] = line;
        Ok(())
    }

    /// Appends a line, growing the registry by one row.
    ///
    /// Only valid on `N x 1` (or empty) registries.
    pub fn push(&mut self, line: Line) -> Result<()> {
        if self.cols > 1 {
            return Err(DarkLineError::InvalidInput(format!(
                "cannot append to a {}x{} grid registry",
                self.rows, self.cols
            )));
        }
        self.slots.try_reserve(1)?;
        self.slots.push(line);
        self.rows += 1;
        self.cols = 1;
        Ok(())
    }

    pub fn lines(&self) -> &[Line] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.slots.iter()
    }

    /// Keeps only lines matching `f`; the result is reshaped to `N x 1`.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Line) -> bool,
    {
        self.slots.retain(f);
        self.rows = self.slots.len();
        self.cols = if self.rows == 0 { 0 } else { 1 };
    }

    pub fn count(&self, orientation: Orientation) -> usize {
        self.iter().filter(|l| l.orientation() == orientation).count()
    }

    pub fn count_in_object(&self) -> usize {
        self.iter().filter(|l| l.in_object).count()
    }

    pub fn count_isolated(&self) -> usize {
        self.iter().filter(|l| !l.in_object).count()
    }

    /// Brings every line in line with a buffer that had `removed_rows` and
    /// `removed_cols` (indexed in the old coordinates) stitched out.
    ///
    /// Lines entirely inside a removed band disappear; the rest shift back
    /// by the number of removed indices before them and lose any removed
    /// indices inside them.
    pub(crate) fn rebase(
        &mut self,
        removed_rows: &BitSlice,
        removed_cols: &BitSlice,
        new_rows: usize,
        new_cols: usize,
    ) {
        for line in self.slots.iter_mut() {
            rebase_line(line, removed_rows, removed_cols, new_rows, new_cols);
        }
        self.retain(|l| l.width > 0);
    }
}

impl<'a> IntoIterator for &'a LineRegistry {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// Counts set bits of `mask` in `start..end`, treating indices past the mask as unset.
fn removed_in(mask: &BitSlice, start: usize, end: usize) -> usize {
    let end = end.min(mask.len());
    if start >= end {
        0
    } else {
        mask[start..end].count_ones()
    }
}

pub(crate) fn rebase_line(
    line: &mut Line,
    removed_rows: &BitSlice,
    removed_cols: &BitSlice,
    new_rows: usize,
    new_cols: usize,
) {
    let mask = if line.is_vertical { removed_cols } else { removed_rows };
    let start = line.position();
    let before = removed_in(mask, 0, start);
    let inside = removed_in(mask, start, line.end());
    let width = line.width - inside;
    if line.is_vertical {
        line.x = start - before;
        line.start_y = 0;
        line.end_y = new_rows.saturating_sub(1);
    } else {
        line.y = start - before;
        line.start_x = 0;
        line.end_x = new_cols.saturating_sub(1);
    }
    line.width = width;
}

/// Allocates a registry with `count` slots.
pub fn create_registry(count: usize) -> Result<LineRegistry> {
    LineRegistry::create(count)
}

/// Releases a registry's storage. `None` is a no-op.
pub fn destroy_registry(registry: Option<&mut LineRegistry>) {
    if let Some(registry) = registry {
        registry.destroy();
    }
}

/// Produces an independent copy of `source`.
pub fn copy_registry(source: &LineRegistry) -> Result<LineRegistry> {
    source.try_clone()
}
