// src/removal/summary.rs

//! Human-readable "what changed" report from a before/after registry pair.
//!
//! Lines are matched by orientation, coordinate and width. A line that a
//! stitch merely shifted therefore shows up as removed at its old position;
//! the report is meant for people, not for parsing.

use std::fmt;

use crate::lines::line::Line;
use crate::lines::registry::LineRegistry;

/// Per-category line counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub vertical_isolated: usize,
    pub vertical_in_object: usize,
    pub horizontal_isolated: usize,
    pub horizontal_in_object: usize,
}

impl CategoryCounts {
    fn add(&mut self, line: &Line) {
        let slot = match (line.is_vertical, line.in_object) {
            (true, false) => &mut self.vertical_isolated,
            (true, true) => &mut self.vertical_in_object,
            (false, false) => &mut self.horizontal_isolated,
            (false, true) => &mut self.horizontal_in_object,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.vertical_isolated
            + self.vertical_in_object
            + self.horizontal_isolated
            + self.horizontal_in_object
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemovalSummary {
    pub before: usize,
    pub after: usize,
    /// Lines present before and not found afterwards.
    pub removed: Vec<Line>,
    pub removed_counts: CategoryCounts,
    pub remaining_counts: CategoryCounts,
}

impl RemovalSummary {
    pub fn between(before: &LineRegistry, after: &LineRegistry) -> Self {
        let mut matched = vec![false; after.len()];
        let mut summary = RemovalSummary {
            before: before.len(),
            after: after.len(),
            ..Self::default()
        };

        for line in before {
            let hit = after
                .iter()
                .enumerate()
                .find(|(i, other)| !matched[*i] && line.same_line(other))
                .map(|(i, _)| i);
            match hit {
                Some(i) => matched[i] = true,
                None => {
                    summary.removed_counts.add(line);
                    summary.removed.push(*line);
                }
            }
        }
        for line in after {
            summary.remaining_counts.add(line);
        }
        summary
    }
}

impl fmt::Display for RemovalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed.is_empty() {
            writeln!(f, "No lines removed ({} detected).", self.before)?;
        } else {
            writeln!(
                f,
                "Removed {} of {} detected lines:",
                self.removed.len(),
                self.before
            )?;
            let c = &self.removed_counts;
            writeln!(
                f,
                "  vertical: {} isolated, {} in-object",
                c.vertical_isolated, c.vertical_in_object
            )?;
            writeln!(
                f,
                "  horizontal: {} isolated, {} in-object",
                c.horizontal_isolated, c.horizontal_in_object
            )?;
            for line in &self.removed {
                writeln!(f, "  - {}", line)?;
            }
        }
        write!(f, "{} lines remain.", self.remaining_counts.total())
    }
}

/// Renders the before/after diff as text.
pub fn summarize(before: &LineRegistry, after: &LineRegistry) -> String {
    RemovalSummary::between(before, after).to_string()
}
