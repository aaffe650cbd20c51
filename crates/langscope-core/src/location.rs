//! Source location types for positions within raw documentation text.

use serde::{Deserialize, Serialize};

/// A region of the source text, expressed in 0-based lines and columns.
///
/// Lines are inclusive on both ends. Columns are byte offsets within a line;
/// `end_column` is exclusive, matching the end offset of a pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// Starting line (0-based)
    pub start_line: usize,
    /// Ending line (0-based, inclusive)
    pub end_line: usize,
    /// Starting column on `start_line`
    pub start_column: usize,
    /// Ending column on `end_line` (exclusive)
    pub end_column: usize,
}

impl SourceRange {
    /// Create a new range.
    pub fn new(start_line: usize, end_line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }

    /// Create a range spanning part of a single line.
    pub fn single_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start_line: line,
            end_line: line,
            start_column,
            end_column,
        }
    }

    /// Check basic ordering invariants: `end_line >= start_line`, and for
    /// single-line ranges `end_column >= start_column`.
    pub fn is_valid(&self) -> bool {
        self.end_line > self.start_line
            || (self.end_line == self.start_line && self.end_column >= self.start_column)
    }

    /// Check if a (line, column) point falls inside this range.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && column < self.start_column {
            return false;
        }
        if line == self.end_line && column >= self.end_column {
            return false;
        }
        true
    }

    /// Expand this range to cover another range.
    ///
    /// Start and end points are compared lexicographically by (line, column),
    /// so column bounds only move when the other range shares (or replaces)
    /// the extreme line.
    pub fn expand_to_include(&mut self, other: &SourceRange) {
        if (other.start_line, other.start_column) < (self.start_line, self.start_column) {
            self.start_line = other.start_line;
            self.start_column = other.start_column;
        }
        if (other.end_line, other.end_column) > (self.end_line, self.end_column) {
            self.end_line = other.end_line;
            self.end_column = other.end_column;
        }
    }

    /// Bounding range over a non-empty set of ranges, or `None` on empty input.
    pub fn bounding(ranges: &[SourceRange]) -> Option<SourceRange> {
        let mut iter = ranges.iter();
        let mut bounds = *iter.next()?;
        for range in iter {
            bounds.expand_to_include(range);
        }
        Some(bounds)
    }
}
