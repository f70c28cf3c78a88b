//! Template source parsing.
//!
//! This module covers everything between raw document text and a compiled
//! [`Template`](crate::Template) tree: include expansion, parameter
//! extraction, secret-token tagging of conditional markers, block
//! discovery, and the placeholder scanner shared with the renderer.

mod block;
mod document;
pub mod error;
mod include;
mod placeholder;

pub use error::{LoadError, ParseError};
pub use include::{FsLoader, SourceLoader};
pub use placeholder::{BLOCK_TAG, Placeholder, PlaceholderKind, scan_placeholders};

pub(crate) use document::{extract_parameters, parse_document, tag_directives};
pub(crate) use include::expand_includes;
