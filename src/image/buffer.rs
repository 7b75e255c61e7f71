// src/image/buffer.rs

//! Owned, resizable 2D buffer of real-valued samples.
//!
//! Every row is its own `Vec<f64>`, so stitching can rebuild the image row
//! by row at smaller dimensions. Copies are always deep; two live buffers
//! never share row storage.

use crate::image::display::{DisplayFrame, Gray16};
use crate::utils::error::{DarkLineError, Result};

/// Largest sample value the 16-bit display stage can represent.
pub const MAX_SAMPLE: f64 = 65535.0;

/// A single-channel image with explicit row/column counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageBuffer {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

/// Allocates one row of `cols` samples, reporting allocation failure instead of aborting.
pub(crate) fn alloc_row(cols: usize, value: f64) -> Result<Vec<f64>> {
    let mut row = Vec::new();
    row.try_reserve_exact(cols)?;
    row.resize(cols, value);
    Ok(row)
}

/// Allocates the outer row table for `rows` rows.
pub(crate) fn alloc_rows(rows: usize) -> Result<Vec<Vec<f64>>> {
    let mut data = Vec::new();
    data.try_reserve_exact(rows)?;
    Ok(data)
}

impl ImageBuffer {
    /// Creates a zero-filled buffer.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, 0.0)
    }

    /// Creates a buffer with every sample set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        let mut data = alloc_rows(rows)?;
        for _ in 0..rows {
            data.push(alloc_row(cols, value)?);
        }
        Ok(ImageBuffer { rows, cols, data })
    }

    /// Creates a buffer by calling `f(y, x)` for each sample.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = alloc_rows(rows)?;
        for y in 0..rows {
            let mut row = alloc_row(cols, 0.0)?;
            for (x, sample) in row.iter_mut().enumerate() {
                *sample = f(y, x);
            }
            data.push(row);
        }
        Ok(ImageBuffer { rows, cols, data })
    }

    /// Takes ownership of row vectors. All rows must have the same length.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Self> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        if let Some((y, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(DarkLineError::InvalidInput(format!(
                "row {} has {} samples, expected {}",
                y,
                row.len(),
                cols
            )));
        }
        Ok(ImageBuffer { rows, cols, data })
    }

    /// Builds a buffer from row-major 16-bit samples as handed over by a loader.
    pub fn from_u16_samples(rows: usize, cols: usize, samples: &[u16]) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            DarkLineError::InvalidInput(format!("{}x{} overflows the sample count", rows, cols))
        })?;
        if samples.len() != expected {
            return Err(DarkLineError::InvalidInput(format!(
                "expected {} samples for a {}x{} image, got {}",
                expected,
                rows,
                cols,
                samples.len()
            )));
        }
        Self::from_fn(rows, cols, |y, x| samples[y * cols + x] as f64)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the dimensions as a tuple (rows, cols).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, y: usize, x: usize) -> f64 {
        assert!(y < self.rows && x < self.cols);
        self.data[y][x]
    }

    pub fn set(&mut self, y: usize, x: usize, value: f64) {
        assert!(y < self.rows && x < self.cols);
        self.data[y][x] = value;
    }

    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [f64] {
        &mut self.data[y]
    }

    pub(crate) fn row_slices(&self) -> &[Vec<f64>] {
        &self.data
    }

    /// Checks the buffer is non-empty and rectangular.
    ///
    /// Every public operation calls this before touching the samples.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(DarkLineError::InvalidInput(format!(
                "image buffer is empty ({}x{})",
                self.rows, self.cols
            )));
        }
        if self.data.len() != self.rows {
            return Err(DarkLineError::InvalidInput(format!(
                "buffer claims {} rows but stores {}",
                self.rows,
                self.data.len()
            )));
        }
        if let Some(y) = self.data.iter().position(|r| r.len() != self.cols) {
            return Err(DarkLineError::InvalidInput(format!(
                "row {} has {} samples, expected {}",
                y,
                self.data[y].len(),
                self.cols
            )));
        }
        Ok(())
    }

    /// Quantizes the samples for the display stage.
    pub fn to_display_frame(&self) -> Result<DisplayFrame> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.rows * self.cols)?;
        for row in &self.data {
            data.extend(row.iter().map(|&v| Gray16::from_sample(v)));
        }
        Ok(DisplayFrame::from_vec(self.cols, self.rows, data))
    }
}
