// src/removal/neighbor.rs

//! Neighbour-value infill: replaces dark pixels on a line with the median of
//! nearby bright pixels along the axis across the line.

use crate::image::buffer::ImageBuffer;
use crate::lines::line::Line;
use crate::lines::params::RemovalParams;
use crate::utils::error::Result;

/// Median taken as the element at index `len / 2` of the ascending sort.
/// `None` when `values` is empty.
pub(crate) fn median_at_half(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(values[values.len() / 2])
}

/// Replacement for the pixel at `(y, x)` on `line`, or `None` when no bright
/// neighbour lies within the search radius.
fn replacement_value(
    image: &ImageBuffer,
    line: &Line,
    y: usize,
    x: usize,
    params: &RemovalParams,
    scratch: &mut Vec<f64>,
) -> Option<f64> {
    let radius = params.search_radius(line.width);
    scratch.clear();
    let mut keep = |v: f64| {
        if v > params.min_brightness {
            scratch.push(v);
        }
    };

    if line.is_vertical {
        let row = image.row(y);
        for offset in 1..=radius {
            if let Some(left) = x.checked_sub(offset) {
                keep(row[left]);
            }
            if let Some(&right) = row.get(x + offset) {
                keep(right);
            }
        }
    } else {
        for offset in 1..=radius {
            if let Some(above) = y.checked_sub(offset) {
                keep(image.get(above, x));
            }
            if y + offset < image.rows() {
                keep(image.get(y + offset, x));
            }
        }
    }
    median_at_half(scratch)
}

/// Infills the dark pixels of one line and returns how many were replaced.
///
/// Replacements are computed against the image as it was before this line
/// was touched, then written back together.
pub(crate) fn infill_line(
    image: &mut ImageBuffer,
    line: &Line,
    params: &RemovalParams,
) -> Result<usize> {
    let (ys, xs) = if line.is_vertical {
        (line.start_y..=line.end_y, line.x..=line.end() - 1)
    } else {
        (line.y..=line.end() - 1, line.start_x..=line.end_x)
    };

    let mut scratch = Vec::new();
    scratch.try_reserve_exact(params.search_radius(line.width) * 2)?;
    let mut updates = Vec::new();
    updates.try_reserve_exact(ys.clone().count() * xs.clone().count())?;
    for y in ys {
        for x in xs.clone() {
            if image.get(y, x) > params.min_brightness {
                continue;
            }
            if let Some(value) = replacement_value(image, line, y, x, params, &mut scratch) {
                updates.push((y, x, value));
            }
        }
    }

    for &(y, x, value) in &updates {
        image.set(y, x, value);
    }
    log::trace!("infilled {} pixels on {}", updates.len(), line);
    Ok(updates.len())
}
