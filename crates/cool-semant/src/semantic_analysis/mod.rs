// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for Cool.
//!
//! This module checks a parsed program and annotates it with static types:
//! - Class table and inheritance graph validation (via `class_hierarchy`)
//! - Binary-lifted ancestor queries, LCA and conformance (via `ancestor_index`)
//! - Method installation, resolution and override checks (via `method_table`)
//! - Entry point validation (via `validators`)
//! - Type inference over every method and attribute body (via `type_checker`)
//!
//! The phases run strictly in that order. Each one reports into the same
//! error list and none of them stops early, so a single run surfaces every
//! independent problem. The tables built along the way are returned for the
//! code generator.

use crate::ast::Program;
use crate::source_analysis::Diagnostic;
use tracing::{debug, info_span, trace};

pub mod ancestor_index;
pub mod class_hierarchy;
pub mod error;
pub mod method_table;
pub mod scope;
mod type_checker;
pub mod validators;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use ancestor_index::AncestorIndex;
pub use class_hierarchy::{AttributeInfo, ClassHierarchy, ClassInfo, FormalInfo, MethodInfo};
pub use error::{SemanticError, SemanticErrorKind};
pub use method_table::MethodTable;
pub use scope::{Binding, BindingKind, ScopeGuard, TypeEnv};

/// Final line printed after the diagnostics of a failed run.
pub const HALT_MESSAGE: &str = "Compilation halted due to static semantic errors.";

/// The read-only tables shared by the type checker and the code generator.
///
/// **DDD Context:** Semantic Analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTables {
    pub hierarchy: ClassHierarchy,
    pub ancestors: AncestorIndex,
    pub methods: MethodTable,
}

/// Result of semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Errors in discovery order.
    pub errors: Vec<SemanticError>,
    pub tables: ProgramTables,
}

impl AnalysisResult {
    /// Returns true if the program must not proceed to code generation.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors rendered as diagnostics, in discovery order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(SemanticError::to_diagnostic).collect()
    }
}

/// Analyse a program, writing the inferred type into every checked expression.
///
/// ```
/// use cool_semant::ast::{Class, Expression, Method, Program};
/// use cool_semant::semantic_analysis::analyse;
///
/// let main = Method::new("main", vec![], "Int", Expression::int(0, 2), 2);
/// let mut program = Program::new(vec![Class::new("Main", "Object", vec![main.into()], "main.cl", 1)]);
///
/// let result = analyse(&mut program);
/// assert!(!result.has_errors());
/// ```
pub fn analyse(program: &mut Program) -> AnalysisResult {
    let _analysis = info_span!("analyse", classes = program.classes.len()).entered();

    let (hierarchy, mut errors) = {
        let _phase = info_span!("install_classes").entered();
        ClassHierarchy::build(program)
    };

    let ancestors = {
        let _phase = info_span!("check_inheritance_graph").entered();
        let ancestors = AncestorIndex::build(&hierarchy);
        errors.extend(hierarchy.check_reachability(&ancestors));
        ancestors
    };

    let methods = {
        let _phase = info_span!("install_methods").entered();
        let (methods, method_errors) = MethodTable::install(&hierarchy);
        errors.extend(method_errors);
        methods
    };

    {
        let _phase = info_span!("check_entry_point").entered();
        errors.extend(validators::check_entry_point(&hierarchy, &methods));
    }

    let tables = ProgramTables {
        hierarchy,
        ancestors,
        methods,
    };

    {
        let _phase = info_span!("check_features").entered();
        let mut checker = type_checker::TypeChecker::new(&tables);
        checker.check_program(program);
        errors.extend(checker.into_errors());
    }

    for error in &errors {
        trace!(file = ?error.file, line = error.span.line(), "{}", error.kind);
    }
    debug!(errors = errors.len(), "semantic analysis complete");

    AnalysisResult { errors, tables }
}
