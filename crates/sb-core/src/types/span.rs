//! Source line ranges for located detections.
//!
//! This module provides the [`SourceSpan`] type describing where in a file a
//! detection was matched.

use serde::{Deserialize, Serialize};

/// A line range within a source file.
///
/// # Field Conventions
///
/// - Lines are 1-indexed (the first line is line 1)
/// - `start_line == 0` means line information is unavailable, which happens
///   when a detection came from a text-only match with no syntax tree behind
///   it
///
/// # Examples
///
/// ```
/// use sb_core::SourceSpan;
///
/// let span = SourceSpan::new(4, 12);
/// assert!(span.is_located());
/// assert_eq!(span.line_count(), 9);
///
/// let unknown = SourceSpan::unknown();
/// assert!(!unknown.is_located());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First line of the matched construct (1-indexed, 0 = unknown).
    pub start_line: u32,

    /// Last line of the matched construct (1-indexed, 0 = unknown).
    pub end_line: u32,
}

impl SourceSpan {
    /// Creates a new span from 1-indexed start and end lines.
    #[inline]
    #[must_use]
    pub const fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Creates a span for a single line.
    #[inline]
    #[must_use]
    pub const fn line(line: u32) -> Self {
        Self::new(line, line)
    }

    /// Creates a span with no line information.
    ///
    /// Used by text-only detectors that cannot recover positions.
    #[inline]
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(0, 0)
    }

    /// Returns `true` if this span carries real line information.
    #[inline]
    #[must_use]
    pub const fn is_located(self) -> bool {
        self.start_line > 0
    }

    /// Returns the number of lines covered, or 0 for unknown spans.
    #[inline]
    #[must_use]
    pub const fn line_count(self) -> u32 {
        if self.is_located() {
            self.end_line.saturating_sub(self.start_line) + 1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = SourceSpan::new(10, 20);
        assert_eq!(span.start_line, 10);
        assert_eq!(span.end_line, 20);
        assert!(span.is_located());
        assert_eq!(span.line_count(), 11);
    }

    #[test]
    fn test_span_single_line() {
        let span = SourceSpan::line(7);
        assert_eq!(span.start_line, 7);
        assert_eq!(span.end_line, 7);
        assert_eq!(span.line_count(), 1);
    }

    #[test]
    fn test_span_unknown() {
        let span = SourceSpan::unknown();
        assert!(!span.is_located());
        assert_eq!(span.line_count(), 0);
    }

    #[test]
    fn test_span_serialization() {
        let span = SourceSpan::new(3, 9);
        let json = serde_json::to_string(&span).unwrap();
        let parsed: SourceSpan = serde_json::from_str(&json).unwrap();
        assert_eq!(span, parsed);
    }
}
