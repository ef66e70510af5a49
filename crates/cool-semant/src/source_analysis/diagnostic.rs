// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics reported by the semantic checker.

use super::Span;
use ecow::EcoString;
use std::fmt;

/// Coarse classification of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Class-level declaration problem (duplicate class, bad parent, cycle).
    Declaration,
    /// Method or attribute problem (duplicate method, bad override, shadowed attribute).
    Feature,
    /// Misuse of `self` or an unbound identifier.
    Scoping,
    /// Conformance or operand type failure.
    Type,
    /// Missing `Main` class or `main` method.
    ProgramShape,
}

/// A diagnostic message. Every diagnostic the checker produces is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The error message.
    pub message: EcoString,
    /// File the diagnostic points into, if any.
    pub file: Option<EcoString>,
    /// The source location.
    pub span: Span,
    /// Optional category.
    pub category: Option<DiagnosticCategory>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            message: message.into(),
            file: None,
            span,
            category: None,
        }
    }

    /// Attaches the file the span refers to.
    #[must_use]
    pub fn in_file(mut self, file: impl Into<EcoString>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attaches a category.
    #[must_use]
    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Renders `<filename>:<line>: <message>`, or just the message when the
/// diagnostic is not tied to a file.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}: {}", self.span.line(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_file() {
        let diag = Diagnostic::error("Undeclared identifier x.", Span::new(4)).in_file("a.cl");
        assert_eq!(diag.to_string(), "a.cl:4: Undeclared identifier x.");
    }

    #[test]
    fn display_without_file() {
        let diag = Diagnostic::error("Class Main is not defined.", Span::SYNTHETIC);
        assert_eq!(diag.to_string(), "Class Main is not defined.");
    }

    #[test]
    fn category_is_attached() {
        let diag = Diagnostic::error("x", Span::new(1)).with_category(DiagnosticCategory::Type);
        assert_eq!(diag.category, Some(DiagnosticCategory::Type));
        assert!(diag.file.is_none());
    }
}
