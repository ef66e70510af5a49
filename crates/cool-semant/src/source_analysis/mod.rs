// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source positions and diagnostics.
//!
//! **DDD Context:** Source Analysis
//!
//! Lexing and parsing happen outside this crate; the parser hands over a
//! class forest whose nodes already carry a [`Span`]. This module owns the
//! position type and the [`Diagnostic`] value that every later phase reports
//! through.

mod diagnostic;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticCategory};
pub use span::Span;
