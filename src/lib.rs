//! Dark-line detection and removal for large single-channel 16-bit images.
//!
//! Sensor seams and similar artifacts show up as rows or columns that are
//! almost entirely dark. This crate finds them, decides whether each one is
//! an isolated artifact or part of a real dark object, and removes a chosen
//! subset either by infilling from neighbouring pixels or by stitching the
//! rows/columns out of the image.
//!
//! # Quick Start
//!
//! ```
//! use darkline::{ImageBuffer, RemovalMethod, ScanOrientation, copy_registry, scan, summarize};
//!
//! # fn main() -> darkline::Result<()> {
//! // A bright 64x64 image with a dark seam at column 20.
//! let mut image = ImageBuffer::from_fn(64, 64, |_, x| if x == 20 { 0.0 } else { 65535.0 })?;
//!
//! let mut registry = scan(&image, ScanOrientation::Both)?;
//! let before = copy_registry(&registry)?;
//!
//! // Stitch out isolated lines only.
//! let outcome = darkline::remove_selective(
//!     &mut image,
//!     &mut registry,
//!     false,
//!     true,
//!     RemovalMethod::DirectStitch,
//! )?;
//! assert_eq!(outcome.dimensions(), (64, 63));
//! println!("{}", summarize(&before, &registry));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Parallel scan**: the `rayon` feature (on by default) spreads the
//!   per-row/per-column darkness test over worker threads. Results do not
//!   depend on the worker count.
//! - **Atomic stitching**: stitched images are built aside and swapped in,
//!   so a failed removal never leaves a half-edited buffer.
//! - **Sequential bookkeeping**: line-by-line removal keeps the coordinates
//!   of lines still to be removed valid as the image shrinks.

pub mod image;
pub mod lines;
pub mod removal;
pub mod utils;

// Image types
pub use image::{DisplayFrame, Gray16, ImageBuffer};

// Detection
pub use lines::{
    DetectionParams, Line, LineRegistry, LineScanner, LineSelection, Orientation, RemovalParams,
    ScanOrientation, copy_registry, create_registry, destroy_registry, scan,
};

// Removal
pub use removal::{
    LineRemover, RemovalMethod, RemovalOutcome, RemovalSummary, remove_selective,
    remove_sequential, summarize,
};

// Error types
pub use utils::error::{DarkLineError, Result};
