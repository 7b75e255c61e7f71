// src/lines/classify.rs

//! Decides whether a detected line sits inside a darker object.
//!
//! A line is "in object" as soon as one pixel sampled just outside its band
//! is darker than the white threshold. Vertical lines are checked on every
//! row; horizontal lines only at about ten evenly spaced columns, which keeps
//! the cost bounded when a scan reports hundreds of lines.

use crate::image::buffer::ImageBuffer;
use crate::lines::line::Line;
use crate::lines::params::{DetectionParams, HORIZONTAL_SAMPLE_POINTS};

/// Classifies `line` against `image` and returns the `in_object` verdict.
pub fn is_in_object(image: &ImageBuffer, line: &Line, params: &DetectionParams) -> bool {
    if line.is_vertical {
        vertical_in_object(image, line.x, line.width, params)
    } else {
        horizontal_in_object(image, line.y, line.width, params)
    }
}

/// Sets `line.in_object` in place.
pub fn classify(image: &ImageBuffer, line: &mut Line, params: &DetectionParams) {
    line.in_object = is_in_object(image, line, params);
    log::trace!("classified {}", line);
}

fn vertical_in_object(
    image: &ImageBuffer,
    x: usize,
    width: usize,
    params: &DetectionParams,
) -> bool {
    let cols = image.cols();
    let right_start = x + width;
    for row in image.row_slices() {
        for offset in 1..=params.vertical_check_range {
            if let Some(left) = x.checked_sub(offset) {
                if row[left] < params.white_threshold {
                    return true;
                }
            }
            let right = right_start + offset - 1;
            if right < cols && row[right] < params.white_threshold {
                return true;
            }
        }
    }
    false
}

fn horizontal_in_object(
    image: &ImageBuffer,
    y: usize,
    width: usize,
    params: &DetectionParams,
) -> bool {
    let rows = image.rows();
    let cols = image.cols();
    // cols / 10 is zero for narrow images.
    let step = (cols / HORIZONTAL_SAMPLE_POINTS).max(1);
    let below_start = y + width;
    for x in (0..cols).step_by(step) {
        for offset in 1..=params.horizontal_check_range {
            if let Some(above) = y.checked_sub(offset) {
                if image.get(above, x) < params.white_threshold {
                    return true;
                }
            }
            let below = below_start + offset - 1;
            if below < rows && image.get(below, x) < params.white_threshold {
                return true;
            }
        }
    }
    false
}
