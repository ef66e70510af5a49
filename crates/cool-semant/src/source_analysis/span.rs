// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every class, feature and expression carries a `Span` recording the line it
//! was parsed from. The file name lives on the enclosing class, so a span on
//! its own is only a line number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A source position, represented as a one-based line number.
///
/// Line `0` is reserved for nodes synthesized by the compiler itself
/// (the built-in classes).
///
/// # Examples
///
/// ```
/// use cool_semant::source_analysis::Span;
///
/// let span = Span::new(12);
/// assert_eq!(span.line(), 12);
/// assert!(!span.is_synthetic());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Span {
    line: u32,
}

impl Span {
    /// Span used for compiler-synthesized nodes.
    pub const SYNTHETIC: Self = Self { line: 0 };

    /// Creates a span for the given line.
    #[must_use]
    pub const fn new(line: u32) -> Self {
        Self { line }
    }

    /// Returns the line number.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns true if this span does not point into user source.
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.line == 0
    }
}

impl From<u32> for Span {
    fn from(line: u32) -> Self {
        Self::new(line)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_and_accessors() {
        let span = Span::new(7);
        assert_eq!(span.line(), 7);
        assert!(!span.is_synthetic());
    }

    #[test]
    fn synthetic_span_is_line_zero() {
        assert_eq!(Span::SYNTHETIC.line(), 0);
        assert!(Span::SYNTHETIC.is_synthetic());
        assert_eq!(Span::default(), Span::SYNTHETIC);
    }

    #[test]
    fn span_from_line() {
        let span: Span = 42u32.into();
        assert_eq!(span.line(), 42);
        assert_eq!(span.to_string(), "42");
    }
}
