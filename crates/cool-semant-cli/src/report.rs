// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rendering analysis results.

use crate::error::CliError;
use cool_semant::ast::Program;
use cool_semant::semantic_analysis::{AnalysisResult, HALT_MESSAGE};
use std::io::{self, Write};

/// Writes one `file:line: message` line per error, in discovery order, then
/// the halt message if there was any error.
pub fn write_report(out: &mut impl Write, result: &AnalysisResult) -> io::Result<()> {
    for diagnostic in result.diagnostics() {
        writeln!(out, "{diagnostic}")?;
    }
    if result.has_errors() {
        writeln!(out, "{HALT_MESSAGE}")?;
    }
    out.flush()
}

/// Writes the type-annotated program as pretty JSON.
pub fn write_annotated(out: &mut impl Write, program: &Program) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, program).map_err(|source| CliError::Json {
        origin: "annotated program".to_string(),
        source,
    })?;
    writeln!(out).map_err(CliError::Output)
}
