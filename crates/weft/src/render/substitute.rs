//! Text substitution passes.
//!
//! The substitution of resolved values happens as one atomic multi-pattern
//! pass: at every position the longest matching pattern wins and its
//! replacement is emitted without being rescanned. Sequential single-pattern
//! replacement would let a value that happens to contain another variable's
//! placeholder syntax be substituted again — cross-talk between variables.

use crate::parser::scan_placeholders;

/// Replace every pattern occurrence in one pass, longest match first.
///
/// Replacement text is never rescanned. Empty patterns are ignored.
pub(crate) fn substitute_all(source: &str, pairs: &[(String, String)]) -> String {
    let mut ordered: Vec<&(String, String)> =
        pairs.iter().filter(|(pattern, _)| !pattern.is_empty()).collect();
    if ordered.is_empty() {
        return source.to_string();
    }
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    'scan: while !rest.is_empty() {
        for (pattern, replacement) in &ordered {
            if rest.starts_with(pattern.as_str()) {
                output.push_str(replacement);
                rest = &rest[pattern.len()..];
                continue 'scan;
            }
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        output.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    output
}

/// Strip every placeholder that survived substitution.
///
/// Unassigned placeholders render as empty string, never as an error.
pub(crate) fn strip_unassigned(source: &str) -> String {
    let pairs: Vec<(String, String)> = scan_placeholders(source)
        .into_iter()
        .map(|p| (p.text, String::new()))
        .collect();
    substitute_all(source, &pairs)
}

/// Remove `<!--- comment --->` regions, each replaced by a single space.
///
/// The space keeps tokens on either side of a comment from concatenating.
pub(crate) fn strip_comments(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("<!---") {
        let after = &rest[start + 5..];
        match after.find("--->") {
            Some(close) => {
                if is_comment_body(&after[..close]) {
                    output.push_str(&rest[..start]);
                    output.push(' ');
                    rest = &after[close + 4..];
                } else {
                    output.push_str(&rest[..start + 5]);
                    rest = after;
                }
            }
            None => break,
        }
    }

    output.push_str(rest);
    output
}

/// A comment body is whitespace-delimited and non-empty: `<!--- text --->`.
fn is_comment_body(inner: &str) -> bool {
    inner.chars().count() >= 3
        && inner.starts_with(|c: char| c.is_whitespace())
        && inner.ends_with(|c: char| c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_text_is_not_rescanned() {
        // A resolves to text containing B's placeholder; B must not replace it.
        let pairs = vec![
            ("${A}".to_string(), "x${B}y".to_string()),
            ("${B}".to_string(), "!".to_string()),
        ];
        assert_eq!(substitute_all("${A} ${B}", &pairs), "x${B}y !");
    }

    #[test]
    fn longest_pattern_wins() {
        let pairs = vec![
            ("${A}".to_string(), "short".to_string()),
            ("${AB}".to_string(), "long".to_string()),
        ];
        assert_eq!(substitute_all("${AB}", &pairs), "long");
    }

    #[test]
    fn unassigned_placeholders_are_stripped() {
        assert_eq!(strip_unassigned("a ${X} b #{Y} c"), "a  b  c");
    }

    #[test]
    fn comment_becomes_single_space() {
        assert_eq!(strip_comments("a<!--- anything --->b"), "a b");
    }

    #[test]
    fn comment_body_may_contain_directive_text() {
        let source = "a<!--- <!-- IF true --> ${X} --->b";
        assert_eq!(strip_comments(source), "a b");
    }
}
