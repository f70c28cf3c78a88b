//! Miette diagnostic wrappers for template parse errors.

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;
use weft::ParseError;

/// A miette-compatible diagnostic for template parse errors.
#[derive(Debug, Error, Diagnostic)]
#[error("{path}: unterminated block '{name}' opened at line {line}")]
#[diagnostic(code(weft::unterminated_block))]
pub struct UnterminatedBlockDiagnostic {
    path: String,
    name: String,
    line: usize,

    #[help]
    help: Option<String>,
}

/// Build a diagnostic for a parse error in `path`.
///
/// Line numbers refer to the document after include expansion.
pub fn load_diagnostic(path: &Path, err: &ParseError) -> UnterminatedBlockDiagnostic {
    match err {
        ParseError::UnterminatedBlock { name, line } => UnterminatedBlockDiagnostic {
            path: path.display().to_string(),
            name: name.clone(),
            line: *line,
            help: Some(format!("add a matching '<!-- END {name} -->' marker")),
        },
    }
}
