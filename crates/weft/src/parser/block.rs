//! Block discovery for `BEGIN`/`END` regions.
//!
//! A single line-oriented pass finds blocks at the outermost nesting level
//! only; markers inside an already-open block belong to nested blocks and
//! are handled when the extracted child text is parsed in its own right.

use super::error::ParseError;

const BEGIN_MARKER: &str = "<!-- BEGIN ";
const END_MARKER: &str = "<!-- END ";
const MARKER_CLOSE: &str = " -->";

/// Scanner state: outside any block, or inside a named one.
enum ScanState {
    Outside,
    Inside { name: String, opened_at: usize },
}

/// Find the names of all outermost blocks, in document order.
///
/// Ending the scan while still inside a block is a hard error: the document
/// is malformed and failing fast beats silently truncating it.
pub(crate) fn discover_outer_blocks(source: &str) -> Result<Vec<String>, ParseError> {
    let mut names = Vec::new();
    let mut state = ScanState::Outside;

    for (index, line) in source.lines().enumerate() {
        if let Some(name) = marker_name(line, BEGIN_MARKER) {
            if matches!(state, ScanState::Outside) {
                names.push(name.clone());
                state = ScanState::Inside {
                    name,
                    opened_at: index + 1,
                };
            }
        }

        if let Some(name) = marker_name(line, END_MARKER) {
            if let ScanState::Inside { name: current, .. } = &state {
                if *current == name {
                    state = ScanState::Outside;
                }
            }
        }
    }

    if let ScanState::Inside { name, opened_at } = state {
        return Err(ParseError::UnterminatedBlock {
            name,
            line: opened_at,
        });
    }

    Ok(names)
}

/// Extract a named block region from `source`.
///
/// Returns the block's inner text and the parent text with the whole
/// `BEGIN…END` span replaced by a `${(Block)name}` placeholder.
pub(crate) fn extract_block(source: &str, name: &str) -> Result<(String, String), ParseError> {
    let begin = format!("{BEGIN_MARKER}{name}{MARKER_CLOSE}");
    let end = format!("{END_MARKER}{name}{MARKER_CLOSE}");

    let begin_at = source
        .find(&begin)
        .ok_or_else(|| unterminated(source, name, 0))?;
    let inner_at = begin_at + begin.len();
    let end_at = source[inner_at..]
        .find(&end)
        .map(|offset| inner_at + offset)
        .ok_or_else(|| unterminated(source, name, begin_at))?;

    let inner = source[inner_at..end_at].to_string();

    let mut parent = String::with_capacity(source.len());
    parent.push_str(&source[..begin_at]);
    parent.push_str("${(Block)");
    parent.push_str(name);
    parent.push('}');
    parent.push_str(&source[end_at + end.len()..]);

    Ok((inner, parent))
}

fn unterminated(source: &str, name: &str, position: usize) -> ParseError {
    ParseError::UnterminatedBlock {
        name: name.to_string(),
        line: source[..position].matches('\n').count() + 1,
    }
}

/// Extract the block name from a marker line, if the line carries one.
///
/// The name is whatever sits between the marker and the next ` -->`,
/// trimmed of surrounding whitespace.
fn marker_name(line: &str, marker: &str) -> Option<String> {
    let start = line.find(marker)?;
    let rest = &line[start + marker.len()..];
    let close = rest.find(MARKER_CLOSE)?;
    Some(rest[..close].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_blocks_only() {
        let source = "a\n<!-- BEGIN OUTER -->\n<!-- BEGIN INNER -->\nx\n<!-- END INNER -->\n<!-- END OUTER -->\nb";
        let names = discover_outer_blocks(source).unwrap();
        assert_eq!(names, vec!["OUTER".to_string()]);
    }

    #[test]
    fn sibling_blocks_in_order() {
        let source = "<!-- BEGIN A -->x<!-- END A -->\n<!-- BEGIN B -->y<!-- END B -->";
        let names = discover_outer_blocks(source).unwrap();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn foreign_end_is_ignored() {
        let source = "<!-- BEGIN A -->\n<!-- END B -->\n<!-- END A -->";
        let names = discover_outer_blocks(source).unwrap();
        assert_eq!(names, vec!["A".to_string()]);
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let source = "x\n<!-- BEGIN A -->\ny";
        let err = discover_outer_blocks(source).unwrap_err();
        match err {
            ParseError::UnterminatedBlock { name, line } => {
                assert_eq!(name, "A");
                assert_eq!(line, 2);
            }
        }
    }

    #[test]
    fn extraction_splices_placeholder() {
        let source = "before <!-- BEGIN A -->inner<!-- END A --> after";
        let (inner, parent) = extract_block(source, "A").unwrap();
        assert_eq!(inner, "inner");
        assert_eq!(parent, "before ${(Block)A} after");
    }
}
