// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-class method tables.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Each class maps to the methods it declares directly. Inherited methods are
//! found by walking the ancestor chain in [`MethodTable::resolve`], so a
//! redefinition in a subclass shadows the ancestor's signature.

use super::ancestor_index::AncestorIndex;
use super::class_hierarchy::{ClassHierarchy, MethodInfo};
use super::error::{SemanticError, SemanticErrorKind};
use ecow::EcoString;
use std::collections::HashMap;
use tracing::debug;

/// Method signatures keyed by declaring class, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodTable {
    methods: HashMap<EcoString, Vec<MethodInfo>>,
}

impl MethodTable {
    /// Install the methods of every class in the hierarchy.
    ///
    /// A name declared twice in one class is reported at the second
    /// declaration; the first stays in the table.
    #[must_use]
    pub fn install(hierarchy: &ClassHierarchy) -> (Self, Vec<SemanticError>) {
        let mut table = Self::default();
        let mut errors = Vec::new();

        for class in hierarchy.classes() {
            let mut installed: Vec<MethodInfo> = Vec::with_capacity(class.methods.len());
            for method in &class.methods {
                if installed.iter().any(|existing| existing.name == method.name) {
                    errors.push(SemanticError::new(
                        SemanticErrorKind::DuplicateMethod {
                            method: method.name.clone(),
                        },
                        class.filename.clone(),
                        method.span,
                    ));
                } else {
                    installed.push(method.clone());
                }
            }
            table.methods.insert(class.name.clone(), installed);
        }

        debug!(
            methods = table.method_count(),
            errors = errors.len(),
            "installed methods"
        );
        (table, errors)
    }

    /// A method declared directly in `class`.
    #[must_use]
    pub fn declared(&self, class: &str, name: &str) -> Option<&MethodInfo> {
        self.methods_of(class).iter().find(|method| method.name == name)
    }

    /// Methods declared directly in `class`.
    #[must_use]
    pub fn methods_of(&self, class: &str) -> &[MethodInfo] {
        self.methods.get(class).map_or(&[], Vec::as_slice)
    }

    /// Total number of installed methods.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }

    /// Find `name` in `start` or its nearest ancestor that declares it.
    #[must_use]
    pub fn resolve<'a>(
        &'a self,
        ancestors: &AncestorIndex,
        start: &str,
        name: &str,
    ) -> Option<&'a MethodInfo> {
        ancestors
            .ancestors(start)
            .find_map(|class| self.declared(class, name))
    }

    /// Compare a method against every strict ancestor that declares the same name.
    ///
    /// For each such ancestor, a formal count mismatch yields one error and
    /// skips the parameter comparison; otherwise each parameter type and the
    /// return type must match exactly.
    #[must_use]
    pub fn check_override(
        &self,
        ancestors: &AncestorIndex,
        class: &str,
        method: &MethodInfo,
    ) -> Vec<SemanticErrorKind> {
        let mut errors = Vec::new();

        for ancestor in ancestors.ancestors(class).skip(1) {
            let Some(original) = self.declared(ancestor, &method.name) else {
                continue;
            };

            if original.return_type != method.return_type {
                errors.push(SemanticErrorKind::OverrideReturnType {
                    method: method.name.clone(),
                    ancestor: ancestor.clone(),
                    expected: original.return_type.clone(),
                    found: method.return_type.clone(),
                });
            }

            if original.arity() != method.arity() {
                errors.push(SemanticErrorKind::OverrideArity {
                    method: method.name.clone(),
                    ancestor: ancestor.clone(),
                    expected: original.arity(),
                    found: method.arity(),
                });
                continue;
            }

            for (expected, found) in original.formals.iter().zip(&method.formals) {
                if expected.type_name != found.type_name {
                    errors.push(SemanticErrorKind::OverrideParameterType {
                        method: method.name.clone(),
                        ancestor: ancestor.clone(),
                        expected: expected.type_name.clone(),
                        found: found.type_name.clone(),
                    });
                }
            }
        }

        errors
    }
}
