// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Loading the parser's JSON output.

use crate::error::CliError;
use camino::Utf8Path;
use cool_semant::ast::Program;
use std::io::Read;
use tracing::debug;

/// Label used in messages when the program comes from stdin.
const STDIN_ORIGIN: &str = "<stdin>";

/// Reads a program from `path`, or from stdin when `path` is `None` or `-`.
pub fn load_program(path: Option<&Utf8Path>) -> Result<Program, CliError> {
    match path {
        Some(path) if path.as_str() != "-" => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_owned(),
                source,
            })?;
            parse_program(&text, path.as_str())
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(CliError::Stdin)?;
            parse_program(&text, STDIN_ORIGIN)
        }
    }
}

/// Decodes a program from JSON text.
pub fn parse_program(text: &str, origin: &str) -> Result<Program, CliError> {
    let program: Program = serde_json::from_str(text).map_err(|source| CliError::Json {
        origin: origin.to_string(),
        source,
    })?;
    debug!(origin, classes = program.classes.len(), "decoded program");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use cool_semant::ast::{Class, Expression, Method};
    use std::io::Write;

    fn sample_json() -> String {
        let main = Method::new("main", vec![], "Int", Expression::int(0, 2), 2);
        let program = Program::new(vec![Class::new("Main", "Object", vec![main.into()], "main.cl", 1)]);
        serde_json::to_string(&program).unwrap()
    }

    #[test]
    fn loads_program_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let program = load_program(Some(&path)).unwrap();
        assert_eq!(program.classes.len(), 1);
        assert_eq!(program.classes[0].name, "Main");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).unwrap();
        let error = load_program(Some(&path)).unwrap_err();
        assert!(matches!(error, CliError::Read { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn malformed_json_names_its_origin() {
        let error = parse_program("{\"classes\": 3}", "broken.json").unwrap_err();
        assert!(matches!(error, CliError::Json { .. }));
        assert_eq!(error.to_string(), "broken.json is not a valid program AST");
    }

    #[test]
    fn empty_program_decodes() {
        let program = parse_program("{\"classes\": []}", STDIN_ORIGIN).unwrap();
        assert!(program.classes.is_empty());
    }
}
