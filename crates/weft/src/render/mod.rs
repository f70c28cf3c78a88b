//! Rendering: scope resolution, value substitution, formatter dispatch,
//! and conditional directive compilation.

mod conditional;
mod context;
mod engine;
pub mod error;
mod formatter;
mod renderer;
mod scope;
mod substitute;

pub use conditional::{ConditionEval, LiteralConditions};
pub use engine::Engine;
pub use error::{RenderError, compute_suggestions};
pub use formatter::{FormatterFactory, FormatterRegistry, ValueFormatter};
