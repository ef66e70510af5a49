// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Cool semantic analyser command-line interface.
//!
//! This is the main entry point for the `semant` command. It reads a parsed
//! class forest as JSON, runs semantic analysis and reports every error on
//! stderr. The exit status is 1 if any error was found.

use camino::Utf8PathBuf;
use clap::Parser;
use cool_semant::semantic_analysis::analyse;
use miette::Result;
use tracing::info;

mod error;
mod input;
mod report;

use error::CliError;

/// Type-check a parsed Cool program.
#[derive(Debug, Parser)]
#[command(name = "semant")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON AST produced by the parser (`-` or omitted reads stdin)
    input: Option<Utf8PathBuf>,

    /// Print the type-annotated AST as JSON on success
    #[arg(long)]
    emit_types: bool,

    /// Tracing filter directive, e.g. `debug` or `cool_semant=trace`
    #[arg(long, env = "SEMANT_LOG", default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(&cli.log);

    let mut program = input::load_program(cli.input.as_deref())?;
    info!(classes = program.classes.len(), "loaded program");

    let result = analyse(&mut program);

    let mut stderr = std::io::stderr().lock();
    report::write_report(&mut stderr, &result).map_err(CliError::Output)?;
    if result.has_errors() {
        std::process::exit(1);
    }

    if cli.emit_types {
        let mut stdout = std::io::stdout().lock();
        report::write_annotated(&mut stdout, &program)?;
    }
    Ok(())
}

/// Initialize logging to stderr, keeping stdout for the annotated AST.
fn init_logging(directive: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
