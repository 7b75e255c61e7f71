//! Pixel containers: the working `f64` buffer and the 16-bit display frame.

pub mod buffer;
pub mod display;

pub use buffer::ImageBuffer;
pub use display::{DisplayFrame, Gray16};
