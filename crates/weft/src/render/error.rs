//! Error types for rendering and template operations.

use thiserror::Error;

/// An error that occurred while rendering or operating on a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Fetch of a block name that was never declared.
    #[error("unknown block '{name}', available: {}", available.join(", "))]
    UnknownBlock {
        name: String,
        suggestions: Vec<String>,
        available: Vec<String>,
    },

    /// A placeholder carried a formatter tag with no registered formatter.
    #[error("unknown formatter '{name}', available: {}", available.join(", "))]
    UnknownFormatter { name: String, available: Vec<String> },

    /// A required document parameter was never declared.
    #[error("required parameter not found: '{name}'")]
    UnknownParameter { name: String },

    /// Block instantiation recursed past the configured depth limit.
    #[error("maximum block nesting depth exceeded")]
    MaxDepthExceeded,

    /// An `IF` directive was never closed by `END IF`.
    #[error("conditional 'IF {expr}' is never closed")]
    UnterminatedConditional { expr: String },

    /// An `ELSE IF`, `ELSE`, or `END IF` appeared without an open `IF`.
    #[error("'{marker}' directive without an open conditional")]
    DanglingConditional { marker: String },

    /// The host condition evaluator rejected an expression.
    #[error("condition '{expr}' could not be evaluated: {message}")]
    Condition { expr: String, message: String },
}

/// Compute "did you mean" suggestions for an unknown name.
///
/// Returns up to three close matches from `available`, best first.
pub fn compute_suggestions(input: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = available
        .iter()
        .map(|candidate| (strsim::jaro_winkler(input, candidate), candidate))
        .filter(|(score, _)| *score > 0.8)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(3).map(|(_, c)| c.clone()).collect()
}
