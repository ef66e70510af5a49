// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Program-shape validators.
//!
//! **DDD Context:** Semantic Analysis

use super::class_hierarchy::ClassHierarchy;
use super::error::{SemanticError, SemanticErrorKind};
use super::method_table::MethodTable;
use crate::names::{MAIN, MAIN_METHOD};

/// Checks that `Main` exists and declares a niladic `main`.
///
/// A missing `Main` class is the only error here without a position, and it
/// ends the check. Inherited `main` methods do not count.
#[must_use]
pub fn check_entry_point(hierarchy: &ClassHierarchy, methods: &MethodTable) -> Vec<SemanticError> {
    let Some(main_class) = hierarchy.get_class(MAIN) else {
        return vec![SemanticError::unlocated(SemanticErrorKind::MissingMainClass)];
    };

    match methods.declared(MAIN, MAIN_METHOD) {
        None => vec![SemanticError::new(
            SemanticErrorKind::MissingMainMethod,
            main_class.filename.clone(),
            main_class.span,
        )],
        Some(main) if main.arity() > 0 => vec![SemanticError::new(
            SemanticErrorKind::MainMethodHasArguments,
            main_class.filename.clone(),
            main.span,
        )],
        Some(_) => Vec::new(),
    }
}
