// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis error types.

use crate::source_analysis::{Diagnostic, DiagnosticCategory, Span};
use ecow::EcoString;

/// A semantic error discovered during analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// File the error points into; `None` only for a missing `Main` class.
    pub file: Option<EcoString>,
    pub span: Span,
}

impl SemanticError {
    /// Create a new semantic error.
    #[must_use]
    pub fn new(kind: SemanticErrorKind, file: impl Into<EcoString>, span: Span) -> Self {
        Self {
            kind,
            file: Some(file.into()),
            span,
        }
    }

    /// Create an error that is not tied to any source position.
    #[must_use]
    pub fn unlocated(kind: SemanticErrorKind) -> Self {
        Self {
            kind,
            file: None,
            span: Span::SYNTHETIC,
        }
    }

    /// Converts into a reportable diagnostic.
    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.kind.to_string(), self.span)
            .with_category(self.kind.category());
        if let Some(file) = &self.file {
            diagnostic = diagnostic.in_file(file.clone());
        }
        diagnostic
    }
}

/// Types of semantic errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticErrorKind {
    // --- Declarations ---
    /// A user class tries to reuse a built-in name (or `SELF_TYPE`).
    #[error("Redefinition of basic class {name}.")]
    BasicClassRedefined { name: EcoString },

    #[error("Class {name} was previously defined.")]
    DuplicateClass { name: EcoString },

    #[error("Class {class} inherits from an undefined class {parent}.")]
    UndefinedParent { class: EcoString, parent: EcoString },

    #[error("Class {class} cannot inherit class {parent}.")]
    SealedParent { class: EcoString, parent: EcoString },

    #[error("Class {class}, or an ancestor of {class}, is involved in an inheritance cycle.")]
    InheritanceCycle { class: EcoString },

    // --- Features ---
    #[error("Method {method} is multiply defined.")]
    DuplicateMethod { method: EcoString },

    #[error(
        "In redefined method {method}, return type {found} is different from original return type {expected} in class {ancestor}."
    )]
    OverrideReturnType {
        method: EcoString,
        ancestor: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error(
        "Incompatible number of formal parameters in redefined method {method} (class {ancestor} declares {expected}, found {found})."
    )]
    OverrideArity {
        method: EcoString,
        ancestor: EcoString,
        expected: usize,
        found: usize,
    },

    #[error(
        "In redefined method {method}, parameter type {found} is different from original type {expected} in class {ancestor}."
    )]
    OverrideParameterType {
        method: EcoString,
        ancestor: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error("Attribute {name} is an attribute of an inherited class.")]
    InheritedAttributeRedefined { name: EcoString },

    #[error("Attribute {name} is multiply defined in class.")]
    DuplicateAttribute { name: EcoString },

    #[error("Class {type_name} of attribute {name} is undefined.")]
    UndefinedAttributeType {
        name: EcoString,
        type_name: EcoString,
    },

    #[error("Formal parameter {name} is multiply defined.")]
    DuplicateFormal { name: EcoString },

    #[error("Class {type_name} of formal parameter {name} is undefined.")]
    UndefinedFormalType {
        name: EcoString,
        type_name: EcoString,
    },

    #[error("Undefined return type {type_name} in method {method}.")]
    UndefinedReturnType {
        method: EcoString,
        type_name: EcoString,
    },

    // --- Scoping ---
    #[error("'self' cannot be the name of an attribute.")]
    SelfAttribute,

    #[error("'self' cannot be the name of a formal parameter.")]
    SelfFormal,

    #[error("'self' cannot be bound in a 'let' expression.")]
    SelfInLet,

    #[error("'self' cannot be bound in a 'case' branch.")]
    SelfInCase,

    #[error("Cannot assign to 'self'.")]
    AssignToSelf,

    #[error("Undeclared identifier {name}.")]
    UndeclaredIdentifier { name: EcoString },

    // --- Types ---
    #[error(
        "Inferred return type {found} of method {method} does not conform to declared return type {expected}."
    )]
    ReturnTypeMismatch {
        method: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error(
        "Inferred type {found} of initialization of attribute {name} does not conform to declared type {expected}."
    )]
    AttributeInitMismatch {
        name: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error(
        "Type {found} of assigned expression does not conform to declared type {expected} of identifier {name}."
    )]
    AssignMismatch {
        name: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error("'new' used with undefined class {type_name}.")]
    NewUndefinedClass { type_name: EcoString },

    #[error("Argument of '{operator}' has type {found} instead of {expected}.")]
    UnaryOperand {
        operator: &'static str,
        expected: &'static str,
        found: EcoString,
    },

    #[error("non-Int arguments: {left} {operator} {right}")]
    NonIntArguments {
        operator: &'static str,
        left: EcoString,
        right: EcoString,
    },

    #[error("Illegal comparison with a basic type ({left} = {right}).")]
    IllegalComparison { left: EcoString, right: EcoString },

    #[error("Class {type_name} of let-bound identifier {name} is undefined.")]
    UndefinedLetType {
        name: EcoString,
        type_name: EcoString,
    },

    #[error(
        "Inferred type {found} of initialization of {name} does not conform to identifier's declared type {expected}."
    )]
    LetInitMismatch {
        name: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error("Duplicate branch {type_name} in case statement.")]
    DuplicateCaseBranch { type_name: EcoString },

    #[error("Class {type_name} of case branch {name} is undefined.")]
    UndefinedCaseBranchType {
        name: EcoString,
        type_name: EcoString,
    },

    #[error("Loop condition does not have type Bool.")]
    LoopPredicate,

    #[error("Predicate of 'if' does not have type Bool.")]
    IfPredicate,

    #[error("Dispatch to undefined method {method}.")]
    UndefinedMethod { method: EcoString },

    #[error("Method {method} called with wrong number of arguments.")]
    WrongArgumentCount { method: EcoString },

    #[error(
        "In call of method {method}, type {found} of parameter {formal} does not conform to declared type {expected}."
    )]
    ArgumentMismatch {
        method: EcoString,
        formal: EcoString,
        expected: EcoString,
        found: EcoString,
    },

    #[error("Static dispatch to undefined class {type_name}.")]
    StaticDispatchUndefinedClass { type_name: EcoString },

    #[error(
        "Expression type {found} does not conform to declared static dispatch type {expected}."
    )]
    StaticDispatchMismatch { expected: EcoString, found: EcoString },

    // --- Program shape ---
    #[error("Class Main is not defined.")]
    MissingMainClass,

    #[error("No 'main' method in class Main.")]
    MissingMainMethod,

    #[error("'main' method in class Main should have no arguments.")]
    MainMethodHasArguments,
}

impl SemanticErrorKind {
    /// The taxonomy bucket this error belongs to.
    #[must_use]
    pub fn category(&self) -> DiagnosticCategory {
        match self {
            Self::BasicClassRedefined { .. }
            | Self::DuplicateClass { .. }
            | Self::UndefinedParent { .. }
            | Self::SealedParent { .. }
            | Self::InheritanceCycle { .. } => DiagnosticCategory::Declaration,

            Self::DuplicateMethod { .. }
            | Self::OverrideReturnType { .. }
            | Self::OverrideArity { .. }
            | Self::OverrideParameterType { .. }
            | Self::InheritedAttributeRedefined { .. }
            | Self::DuplicateAttribute { .. }
            | Self::UndefinedAttributeType { .. }
            | Self::DuplicateFormal { .. }
            | Self::UndefinedFormalType { .. }
            | Self::UndefinedReturnType { .. } => DiagnosticCategory::Feature,

            Self::SelfAttribute
            | Self::SelfFormal
            | Self::SelfInLet
            | Self::SelfInCase
            | Self::AssignToSelf
            | Self::UndeclaredIdentifier { .. } => DiagnosticCategory::Scoping,

            Self::MissingMainClass | Self::MissingMainMethod | Self::MainMethodHasArguments => {
                DiagnosticCategory::ProgramShape
            }

            _ => DiagnosticCategory::Type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_carries_file_line_and_category() {
        let error = SemanticError::new(
            SemanticErrorKind::UndeclaredIdentifier { name: "x".into() },
            "test.cl",
            Span::new(12),
        );
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.to_string(), "test.cl:12: Undeclared identifier x.");
        assert_eq!(diagnostic.category, Some(DiagnosticCategory::Scoping));
    }

    #[test]
    fn unlocated_error_renders_bare_message() {
        let error = SemanticError::unlocated(SemanticErrorKind::MissingMainClass);
        assert_eq!(error.to_diagnostic().to_string(), "Class Main is not defined.");
        assert_eq!(
            error.kind.category(),
            DiagnosticCategory::ProgramShape
        );
    }

    #[test]
    fn messages_interpolate_fields() {
        let kind = SemanticErrorKind::NonIntArguments {
            operator: "+",
            left: "Int".into(),
            right: "String".into(),
        };
        assert_eq!(kind.to_string(), "non-Int arguments: Int + String");
        assert_eq!(kind.category(), DiagnosticCategory::Type);
    }

    #[test]
    fn inheritance_cycle_is_a_declaration_error() {
        let kind = SemanticErrorKind::InheritanceCycle { class: "A".into() };
        assert_eq!(kind.category(), DiagnosticCategory::Declaration);
        assert_eq!(
            kind.to_string(),
            "Class A, or an ancestor of A, is involved in an inheritance cycle."
        );
    }
}
