// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Failures of the driver itself, as opposed to errors in the analysed program.

use camino::Utf8PathBuf;
use miette::Diagnostic;

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}")]
    #[diagnostic(code(semant::read))]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read standard input")]
    #[diagnostic(code(semant::read))]
    Stdin(#[source] std::io::Error),

    #[error("{origin} is not a valid program AST")]
    #[diagnostic(
        code(semant::json),
        help("the input must be the JSON class forest emitted by the parser")
    )]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write output")]
    #[diagnostic(code(semant::write))]
    Output(#[source] std::io::Error),
}
