//! Document compilation pipeline.
//!
//! Order matters and mirrors the engine's load sequence: includes are
//! expanded first, parameter declarations are extracted and removed, the
//! session secret token is prefixed onto conditional markers, and only then
//! are blocks discovered. Tagging before block discovery means every
//! genuine source directive carries the token down into whichever block it
//! ends up in, while text that arrives later through assignments never
//! does.

use super::block::{discover_outer_blocks, extract_block};
use super::error::ParseError;
use crate::types::Template;

const PARAMETER_MARKER: &str = "<!-- PARAMETER ";
const MARKER_CLOSE: &str = " -->";

/// Extract `<!-- PARAMETER name 'value' -->` declarations.
///
/// Returns the source with the declarations removed, plus the declared
/// (name, value) pairs in document order. Malformed declarations are left
/// in place untouched.
pub(crate) fn extract_parameters(source: &str) -> (String, Vec<(String, String)>) {
    let mut parameters = Vec::new();
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find(PARAMETER_MARKER) {
        let after = &rest[start + PARAMETER_MARKER.len()..];

        match parse_declaration(after) {
            Some((name, value, consumed)) => {
                output.push_str(&rest[..start]);
                parameters.push((name, value));
                rest = &after[consumed..];
            }
            None => {
                // Not a well-formed declaration; emit the marker verbatim
                // and keep scanning after it.
                output.push_str(&rest[..start + PARAMETER_MARKER.len()]);
                rest = after;
            }
        }
    }

    output.push_str(rest);
    (output, parameters)
}

/// Parse `name 'value' -->` at the head of `input`.
///
/// Returns the name, the value, and how many bytes were consumed.
fn parse_declaration(input: &str) -> Option<(String, String, usize)> {
    let name_len = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
        .unwrap_or(input.len());
    if name_len == 0 {
        return None;
    }
    let name = &input[..name_len];

    let after_name = &input[name_len..];
    let after_quote = after_name.strip_prefix(" '")?;

    let close = after_quote.find("' -->")?;
    let value = &after_quote[..close];
    if value.is_empty() {
        return None;
    }

    let consumed = name_len + 2 + close + 1 + MARKER_CLOSE.len();
    Some((name.to_string(), value.to_string(), consumed))
}

/// Prefix conditional directive markers with the session secret token.
///
/// Only token-tagged markers are recognized by the conditional compiler, so
/// directive-like text introduced through assigned values stays inert.
pub(crate) fn tag_directives(source: &str, token: &str) -> String {
    let source = source.replace("<!-- IF ", &format!("{token}<!-- IF "));
    let source = source.replace("<!-- ELSE IF ", &format!("{token}<!-- ELSE IF "));
    let source = source.replace("<!-- ELSE -->", &format!("{token}<!-- ELSE -->"));
    source.replace("<!-- END IF -->", &format!("{token}<!-- END IF -->"))
}

/// Discover blocks recursively and build the template tree.
///
/// Each outermost `BEGIN…END` region becomes a child template (itself
/// block-parsed) and is replaced in the parent text by a `${(Block)name}`
/// placeholder.
pub(crate) fn parse_document(source: String) -> Result<Template, ParseError> {
    let names = discover_outer_blocks(&source)?;

    let mut text = source;
    let mut template = Template::empty();

    for name in names {
        let (inner, spliced) = extract_block(&text, &name)?;
        let child = parse_document(inner)?;
        template.insert_block(name, child);
        text = spliced;
    }

    template.set_source(text);
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_are_extracted_and_removed() {
        let source = "a<!-- PARAMETER page.title 'Home' -->b";
        let (text, params) = extract_parameters(source);
        assert_eq!(text, "ab");
        assert_eq!(params, vec![("page.title".to_string(), "Home".to_string())]);
    }

    #[test]
    fn malformed_parameter_is_left_alone() {
        let source = "a<!-- PARAMETER broken -->b";
        let (text, params) = extract_parameters(source);
        assert_eq!(text, source);
        assert!(params.is_empty());
    }

    #[test]
    fn directive_tagging_is_token_prefixed() {
        let tagged = tag_directives("<!-- IF x --> y <!-- END IF -->", "TOK");
        assert_eq!(tagged, "TOK<!-- IF x --> y TOK<!-- END IF -->");
    }

    #[test]
    fn else_if_is_not_double_tagged() {
        let tagged = tag_directives("<!-- ELSE IF x -->", "TOK");
        assert_eq!(tagged, "TOK<!-- ELSE IF x -->");
    }
}
