// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token, AST node, and diagnostic carries a [`Span`] indicating its
//! position in the source file. Positions are one-based `(line, column)`
//! pairs with columns measured in characters, matching the coordinates an
//! editor front-end displays and consumes.

use serde::Serialize;

/// A span of source code, represented as a half-open rectangle from
/// `(start_line, start_column)` up to `(end_line, end_column)`.
///
/// Lines and columns are one-based. On a single line, a span covering the
/// word `FOR` starting at column 5 is `(l, 5)..(l, 8)`.
///
/// # Examples
///
/// ```
/// use pseudoc_core::source_analysis::Span;
///
/// let span = Span::new(1, 5, 1, 8);
/// assert_eq!(span.start_line(), 1);
/// assert_eq!(span.end_column(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

impl Span {
    /// Creates a new span from one-based start and end positions.
    #[must_use]
    pub const fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Creates a span covering `width` characters on a single line.
    #[must_use]
    pub const fn on_line(line: u32, column: u32, width: u32) -> Self {
        Self::new(line, column, line, column + width)
    }

    /// Creates a single-character span at the given position.
    #[must_use]
    pub const fn point(line: u32, column: u32) -> Self {
        Self::on_line(line, column, 1)
    }

    /// Returns the one-based start line.
    #[must_use]
    pub const fn start_line(self) -> u32 {
        self.start_line
    }

    /// Returns the one-based start column.
    #[must_use]
    pub const fn start_column(self) -> u32 {
        self.start_column
    }

    /// Returns the one-based end line.
    #[must_use]
    pub const fn end_line(self) -> u32 {
        self.end_line
    }

    /// Returns the one-based end column (exclusive).
    #[must_use]
    pub const fn end_column(self) -> u32 {
        self.end_column
    }

    /// Returns the start position as a `(line, column)` pair.
    #[must_use]
    pub const fn start(self) -> (u32, u32) {
        (self.start_line, self.start_column)
    }

    /// Returns the end position as a `(line, column)` pair.
    #[must_use]
    pub const fn end(self) -> (u32, u32) {
        (self.end_line, self.end_column)
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let (start_line, start_column) = self.start().min(other.start());
        let (end_line, end_column) = self.end().max(other.end());
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Returns true if `other` starts at or after this span's start and
    /// ends at or before its end.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::point(1, 1)
    }
}
