// src/utils/error.rs

use std::collections::TryReserveError;

use thiserror::Error;

/// The primary error type for all operations in the dark-line library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DarkLineError {
    /// Empty buffer, non-positive dimensions, ragged rows or bad parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A selected line no longer fits the current buffer.
    #[error("Invalid line selection: {0}")]
    InvalidLineSelection(String),

    /// A registry or buffer allocation could not be satisfied.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// The removal would leave an image with no rows or no columns.
    #[error(
        "Degenerate result: removing {removed_rows} rows and {removed_cols} columns from a {rows}x{cols} image leaves nothing"
    )]
    DegenerateResult {
        rows: usize,
        cols: usize,
        removed_rows: usize,
        removed_cols: usize,
    },
}

impl From<TryReserveError> for DarkLineError {
    fn from(err: TryReserveError) -> Self {
        DarkLineError::AllocationFailure(err.to_string())
    }
}

/// A specialized `Result` type for dark-line operations.
pub type Result<T> = std::result::Result<T, DarkLineError>;
