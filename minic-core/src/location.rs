use std::ops::Range;

use serde::Serialize;

/// A byte span into the source text plus the 1-based line the span starts on.
#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub start_byte: usize,
    pub end_byte: usize,
    pub line: u32,
}

impl Location {
    pub fn new(start_byte: usize, end_byte: usize, line: u32) -> Self {
        Self {
            start_byte,
            end_byte,
            line,
        }
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    /// Joins two spans, keeping the line the left span starts on.
    pub fn merge(&self, other: Location) -> Location {
        Location::new(self.start_byte, other.end_byte, self.line)
    }
}
