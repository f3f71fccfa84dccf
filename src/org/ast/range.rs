//! Position and location tracking for source text
//!
//! This module defines the data structures for representing locations in source
//! text, as well as utilities for converting byte offsets to line/column points.
//!
//! ## Types
//!
//! - [`Point`] - A line:column location in source text
//! - [`Range`] - A 1-D byte extent, used where plain offsets suffice
//! - [`Position`] - A span over source text with start/end points
//! - [`SourceIndex`] - Utility for converting byte offsets to points
//!
//! ## Key Design
//!
//! - **No null positions**: the default span is (0, 0) to (0, 0), never None;
//!   a span equal to the default is considered empty
//! - **Total ordering**: `before`/`after` compare points strictly
//!   lexicographically (line first, then column); equal points are neither
//! - **Efficient conversion**: O(log n) binary search for byte-to-point
//!   conversion

use std::fmt;

use serde::{Deserialize, Serialize};

/// A location in source text (line and column, both 0-indexed)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub line: usize,
    pub column: usize,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// True if this point lies strictly before `other` in the source.
    ///
    /// Lines compare first, columns break ties. Equal points are neither
    /// before nor after one another.
    pub fn before(&self, other: &Point) -> bool {
        self < other
    }

    /// True if this point lies strictly after `other` in the source.
    pub fn after(&self, other: &Point) -> bool {
        self > other
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A 1-D byte extent in source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if a byte offset is contained within this range
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A span over source text (start and end points)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A span is empty iff both its points are the zero point.
    ///
    /// Freshly created nodes carry an empty span until their first child is
    /// attached; the tree builder uses this to adopt a child's span outright.
    pub fn is_empty(&self) -> bool {
        self.start == Point::default() && self.end == Point::default()
    }

    /// Check if a point is contained within this span (inclusive on both ends)
    pub fn contains(&self, point: Point) -> bool {
        !point.before(&self.start) && !point.after(&self.end)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Provides fast conversion from byte offsets to line/column points
pub struct SourceIndex {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceIndex {
    /// Create a new SourceIndex from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a line/column point
    pub fn byte_to_point(&self, byte_offset: usize) -> Point {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Point::new(line, column)
    }

    /// Convert a byte range to a position span
    pub fn range_to_position(&self, range: &Range) -> Position {
        Position::new(
            self.byte_to_point(range.start),
            self.byte_to_point(range.end),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}
