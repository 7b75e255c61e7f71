// src/image/display.rs

//! 16-bit frame handed to the render stage after each operation.
//!
//! The core works on `f64` samples; the display layer only ever sees
//! quantized `Gray16` pixels.

use bytemuck::{Pod, Zeroable};

use crate::image::buffer::MAX_SAMPLE;

/// A single grayscale pixel with a 16-bit intensity value.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Gray16 {
    pub v: u16,
}

impl Gray16 {
    pub fn new(v: u16) -> Self {
        Gray16 { v }
    }

    /// Clamps to `[0, 65535]` and rounds to the nearest level.
    pub fn from_sample(sample: f64) -> Self {
        if sample.is_nan() {
            return Gray16 { v: 0 };
        }
        Gray16 {
            v: sample.clamp(0.0, MAX_SAMPLE).round() as u16,
        }
    }
}

/// Row-major buffer of `Gray16` pixels.
#[derive(Clone, Debug)]
pub struct DisplayFrame {
    width: usize,
    height: usize,
    data: Vec<Gray16>,
}

impl DisplayFrame {
    pub fn from_vec(width: usize, height: usize, data: Vec<Gray16>) -> Self {
        assert_eq!(data.len(), width * height);
        DisplayFrame {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Gray16 {
        assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Gray16] {
        &self.data
    }

    /// Returns raw pixel data as native-endian bytes.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}
