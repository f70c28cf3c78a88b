//! Include expansion.
//!
//! `<!-- INCLUDE path -->` directives are inlined recursively before any
//! other parsing happens; nested includes resolve relative to the including
//! file's own directory. Source loading is a pluggable capability so the
//! engine itself performs no I/O beyond what the loader provides.

use std::fs;
use std::io;
use std::path::Path;

use super::error::LoadError;

const INCLUDE_MARKER: &str = "<!-- INCLUDE ";
const MARKER_CLOSE: &str = " -->";

/// Capability to read template source at a path.
pub trait SourceLoader {
    /// Read the full text of the source at `path`.
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Default loader reading from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Recursively inline every include directive in `source`.
///
/// `base_dir` is the directory of the document that `source` came from.
/// `limit` bounds recursion depth; a cyclic include set fails with
/// [`LoadError::IncludeDepthExceeded`] instead of hanging.
pub(crate) fn expand_includes(
    source: &str,
    base_dir: &Path,
    loader: &dyn SourceLoader,
    limit: usize,
) -> Result<String, LoadError> {
    expand(source, base_dir, loader, limit, 0)
}

fn expand(
    source: &str,
    base_dir: &Path,
    loader: &dyn SourceLoader,
    limit: usize,
    depth: usize,
) -> Result<String, LoadError> {
    let mut expanded = source.to_string();

    for (directive, relative) in include_directives(source) {
        let path = base_dir.join(&relative);

        if depth >= limit {
            return Err(LoadError::IncludeDepthExceeded { path, limit });
        }

        let included = loader.load(&path).map_err(|e| LoadError::Io {
            path: path.clone(),
            source: e,
        })?;

        // Nested includes resolve relative to the included file's directory.
        let directory = path.parent().unwrap_or(base_dir);
        let included = expand(&included, directory, loader, limit, depth + 1)?;

        expanded = expanded.replace(&directive, &included);
    }

    Ok(expanded)
}

/// Collect every include directive as (full directive text, relative path).
fn include_directives(source: &str) -> Vec<(String, String)> {
    let mut directives = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find(INCLUDE_MARKER) {
        let after = &rest[start + INCLUDE_MARKER.len()..];
        match after.find(MARKER_CLOSE) {
            Some(close) => {
                let path = &after[..close];
                let full = &rest[start..start + INCLUDE_MARKER.len() + close + MARKER_CLOSE.len()];
                directives.push((full.to_string(), path.to_string()));
                rest = &after[close + MARKER_CLOSE.len()..];
            }
            None => break,
        }
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_are_collected_in_order() {
        let source = "a <!-- INCLUDE x.tpl --> b <!-- INCLUDE sub/y.tpl --> c";
        let found = include_directives(source);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1, "x.tpl");
        assert_eq!(found[1].1, "sub/y.tpl");
    }

    #[test]
    fn unclosed_directive_is_ignored() {
        let source = "a <!-- INCLUDE x.tpl";
        assert!(include_directives(source).is_empty());
    }
}
