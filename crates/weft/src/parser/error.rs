//! Parse and load error types.

use std::path::PathBuf;

use thiserror::Error;

/// An error that occurred while parsing template source.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A `BEGIN` marker was never closed by a same-name `END` marker.
    #[error("unterminated block '{name}' opened at line {line}")]
    UnterminatedBlock { name: String, line: usize },
}

/// Errors that occur while loading a root template.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading the template or an included file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Include recursion went past the configured limit.
    ///
    /// The expander does not detect include cycles; the depth limit is what
    /// turns a cyclic include set into an error instead of a hang.
    #[error("include depth limit of {limit} exceeded while expanding '{path}'")]
    IncludeDepthExceeded { path: PathBuf, limit: usize },

    /// The document failed structural parsing after include expansion.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
