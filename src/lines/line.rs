// src/lines/line.rs

//! The `Line` record and the small enums used to describe scans and selections.

use std::fmt;

/// Smallest run of dark rows/columns that is reported as a line.
pub const MIN_LINE_WIDTH: usize = 1;

/// Axis of a detected line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// A run of dark columns spanning the full image height.
    Vertical,
    /// A run of dark rows spanning the full image width.
    Horizontal,
}

/// Which axes a scan looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanOrientation {
    Vertical,
    Horizontal,
    Both,
}

impl ScanOrientation {
    pub fn includes(self, orientation: Orientation) -> bool {
        match self {
            ScanOrientation::Both => true,
            ScanOrientation::Vertical => orientation == Orientation::Vertical,
            ScanOrientation::Horizontal => orientation == Orientation::Horizontal,
        }
    }
}

/// A detected dark line.
///
/// Vertical lines use `x` and span `start_y..=end_y`; horizontal lines use
/// `y` and span `start_x..=end_x`. The unused coordinate stays zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub is_vertical: bool,
    pub x: usize,
    pub y: usize,
    pub start_x: usize,
    pub end_x: usize,
    pub start_y: usize,
    pub end_y: usize,
    pub width: usize,
    pub in_object: bool,
}

impl Line {
    /// A vertical line covering columns `x..x + width` over all `rows` rows.
    pub fn vertical(x: usize, width: usize, rows: usize) -> Self {
        Line {
            is_vertical: true,
            x,
            start_y: 0,
            end_y: rows.saturating_sub(1),
            width,
            ..Line::default()
        }
    }

    /// A horizontal line covering rows `y..y + width` over all `cols` columns.
    pub fn horizontal(y: usize, width: usize, cols: usize) -> Self {
        Line {
            is_vertical: false,
            y,
            start_x: 0,
            end_x: cols.saturating_sub(1),
            width,
            ..Line::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.is_vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Start coordinate across the line: `x` for vertical, `y` for horizontal.
    pub fn position(&self) -> usize {
        if self.is_vertical { self.x } else { self.y }
    }

    /// Exclusive end of the band, `position() + width`.
    pub fn end(&self) -> usize {
        self.position().saturating_add(self.width)
    }

    /// Whether the stored coordinates are valid against an image of the given size.
    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        if self.width < MIN_LINE_WIDTH {
            return false;
        }
        if self.is_vertical {
            self.x < cols
                && self.end() <= cols
                && self.start_y <= self.end_y
                && self.end_y < rows
        } else {
            self.y < rows
                && self.end() <= rows
                && self.start_x <= self.end_x
                && self.end_x < cols
        }
    }

    /// Identity used when diffing registries: orientation, coordinate and width.
    pub fn same_line(&self, other: &Line) -> bool {
        self.is_vertical == other.is_vertical
            && self.position() == other.position()
            && self.width == other.width
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.in_object { "in-object" } else { "isolated" };
        if self.is_vertical {
            write!(
                f,
                "vertical x={} width={} rows {}..={} ({})",
                self.x, self.width, self.start_y, self.end_y, kind
            )
        } else {
            write!(
                f,
                "horizontal y={} width={} cols {}..={} ({})",
                self.y, self.width, self.start_x, self.end_x, kind
            )
        }
    }
}

/// Which classification categories a removal applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineSelection {
    pub remove_in_object: bool,
    pub remove_isolated: bool,
}

impl LineSelection {
    pub fn new(remove_in_object: bool, remove_isolated: bool) -> Self {
        LineSelection {
            remove_in_object,
            remove_isolated,
        }
    }

    pub fn isolated_only() -> Self {
        Self::new(false, true)
    }

    pub fn in_object_only() -> Self {
        Self::new(true, false)
    }

    pub fn all() -> Self {
        Self::new(true, true)
    }

    pub fn matches(&self, line: &Line) -> bool {
        if line.in_object {
            self.remove_in_object
        } else {
            self.remove_isolated
        }
    }
}
