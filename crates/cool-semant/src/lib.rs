// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Cool semantic analysis.
//!
//! This crate is the middle of a Cool compiler front end:
//! - AST data model shared with the parser and code generator (`ast`)
//! - Source positions and diagnostics (`source_analysis`)
//! - Static types and predefined names (`types`, `names`)
//! - Inheritance graph validation, dispatch resolution and type checking
//!   (`semantic_analysis`)
//!
//! Analysis never stops at the first problem: every independent error in
//! the program is collected and reported together.

pub mod ast;
pub mod names;
pub mod semantic_analysis;
pub mod source_analysis;
pub mod types;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Class, ExprKind, Expression, Feature, Program};
    pub use crate::semantic_analysis::{AnalysisResult, HALT_MESSAGE, SemanticError, analyse};
    pub use crate::source_analysis::{Diagnostic, Span};
    pub use crate::types::StaticType;
}
