//! Conditional directive compilation.
//!
//! Runs after variable substitution, over text in which every genuine
//! source directive carries the session secret token. Only token-tagged
//! markers are recognized here, so `<!-- IF … -->` text that arrived
//! through an assigned value is left as inert literal text. The tagged
//! markers are parsed into a branch structure, branch expressions are
//! handed to the host condition evaluator in order, and the first true
//! branch (or the `ELSE` branch) is rendered.

use crate::render::RenderError;

/// Host capability evaluating a boolean expression string.
///
/// The engine never interprets expressions itself; whatever language the
/// embedding application wants inside `<!-- IF … -->` is decided by this
/// trait. Errors are reported as text and surface as
/// [`RenderError::Condition`].
pub trait ConditionEval {
    /// Evaluate `expr` to a boolean.
    fn evaluate(&self, expr: &str) -> Result<bool, String>;
}

/// Default evaluator accepting boolean literals only.
///
/// Accepts `true`/`TRUE`/`1` and `false`/`FALSE`/`0` (the forms the engine
/// itself interpolates for boolean values); anything else is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralConditions;

impl ConditionEval for LiteralConditions {
    fn evaluate(&self, expr: &str) -> Result<bool, String> {
        match expr.trim() {
            "true" | "TRUE" | "1" => Ok(true),
            "false" | "FALSE" | "0" => Ok(false),
            other => Err(format!("not a boolean literal: '{other}'")),
        }
    }
}

const IF_MARKER: &str = "<!-- IF ";
const ELSE_IF_MARKER: &str = "<!-- ELSE IF ";
const ELSE_MARKER: &str = "<!-- ELSE -->";
const END_IF_MARKER: &str = "<!-- END IF -->";
const MARKER_CLOSE: &str = " -->";

/// One token-delimited unit of the conditional grammar.
#[derive(Debug)]
enum Item {
    Text(String),
    If(String),
    ElseIf(String),
    Else,
    EndIf,
}

/// A single branch of a conditional: `None` condition is the `ELSE` arm.
struct Branch {
    condition: Option<String>,
    body: Vec<Node>,
}

enum Node {
    Text(String),
    Conditional(Vec<Branch>),
}

/// Compile and evaluate every token-tagged conditional in `source`.
pub(crate) fn compile_conditionals(
    source: &str,
    token: &str,
    conditions: &dyn ConditionEval,
) -> Result<String, RenderError> {
    let items = tokenize(source, token);
    let mut pos = 0;
    let nodes = parse_nodes(&items, &mut pos)?;

    // parse_nodes stops at branch markers; any left over at the top level
    // never had an open IF.
    if pos < items.len() {
        let marker = match &items[pos] {
            Item::ElseIf(_) => "ELSE IF",
            Item::Else => "ELSE",
            Item::EndIf | Item::Text(_) | Item::If(_) => "END IF",
        };
        return Err(RenderError::DanglingConditional {
            marker: marker.to_string(),
        });
    }

    evaluate_nodes(&nodes, conditions)
}

/// Split source into text runs and token-tagged directive markers.
fn tokenize(source: &str, token: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find(token) {
        let after = &rest[start + token.len()..];

        let (item, consumed) = match marker(after) {
            Some(found) => found,
            None => {
                // A stray token with no directive behind it; emit it as
                // text and let the final token strip remove it.
                items.push(Item::Text(rest[..start + token.len()].to_string()));
                rest = after;
                continue;
            }
        };

        if start > 0 {
            items.push(Item::Text(rest[..start].to_string()));
        }
        items.push(item);
        rest = &after[consumed..];
    }

    if !rest.is_empty() {
        items.push(Item::Text(rest.to_string()));
    }

    items
}

/// Parse a directive marker at the head of `input`.
fn marker(input: &str) -> Option<(Item, usize)> {
    if let Some(rest) = input.strip_prefix(ELSE_IF_MARKER) {
        let close = rest.find(MARKER_CLOSE)?;
        return Some((
            Item::ElseIf(rest[..close].to_string()),
            ELSE_IF_MARKER.len() + close + MARKER_CLOSE.len(),
        ));
    }
    if let Some(rest) = input.strip_prefix(IF_MARKER) {
        let close = rest.find(MARKER_CLOSE)?;
        return Some((
            Item::If(rest[..close].to_string()),
            IF_MARKER.len() + close + MARKER_CLOSE.len(),
        ));
    }
    if input.starts_with(ELSE_MARKER) {
        return Some((Item::Else, ELSE_MARKER.len()));
    }
    if input.starts_with(END_IF_MARKER) {
        return Some((Item::EndIf, END_IF_MARKER.len()));
    }
    None
}

/// Parse items into nodes until end of input or an unconsumed branch marker.
fn parse_nodes(items: &[Item], pos: &mut usize) -> Result<Vec<Node>, RenderError> {
    let mut nodes = Vec::new();

    while *pos < items.len() {
        match &items[*pos] {
            Item::Text(text) => {
                nodes.push(Node::Text(text.clone()));
                *pos += 1;
            }
            Item::If(expr) => {
                *pos += 1;
                nodes.push(parse_conditional(items, pos, expr)?);
            }
            Item::ElseIf(_) | Item::Else | Item::EndIf => break,
        }
    }

    Ok(nodes)
}

/// Parse the branches of a conditional whose `IF` was just consumed.
fn parse_conditional(
    items: &[Item],
    pos: &mut usize,
    if_expr: &str,
) -> Result<Node, RenderError> {
    let mut branches: Vec<Branch> = Vec::new();
    let mut condition = Some(if_expr.to_string());

    loop {
        let body = parse_nodes(items, pos)?;
        let in_else = condition.is_none();
        branches.push(Branch { condition, body });

        match items.get(*pos) {
            Some(Item::ElseIf(expr)) => {
                if in_else {
                    return Err(RenderError::DanglingConditional {
                        marker: "ELSE IF".to_string(),
                    });
                }
                condition = Some(expr.clone());
                *pos += 1;
            }
            Some(Item::Else) => {
                if in_else {
                    return Err(RenderError::DanglingConditional {
                        marker: "ELSE".to_string(),
                    });
                }
                condition = None;
                *pos += 1;
            }
            Some(Item::EndIf) => {
                *pos += 1;
                return Ok(Node::Conditional(branches));
            }
            Some(Item::Text(_) | Item::If(_)) | None => {
                return Err(RenderError::UnterminatedConditional {
                    expr: if_expr.to_string(),
                });
            }
        }
    }
}

/// Render nodes, evaluating each conditional's branches in order.
fn evaluate_nodes(
    nodes: &[Node],
    conditions: &dyn ConditionEval,
) -> Result<String, RenderError> {
    let mut output = String::new();

    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Conditional(branches) => {
                for branch in branches {
                    let taken = match &branch.condition {
                        Some(expr) => {
                            conditions
                                .evaluate(expr)
                                .map_err(|message| RenderError::Condition {
                                    expr: expr.clone(),
                                    message,
                                })?
                        }
                        None => true,
                    };
                    if taken {
                        output.push_str(&evaluate_nodes(&branch.body, conditions)?);
                        break;
                    }
                }
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> Result<String, RenderError> {
        compile_conditionals(source, "TOK", &LiteralConditions)
    }

    #[test]
    fn true_branch_renders() {
        let out = compile("a TOK<!-- IF true -->b TOK<!-- END IF -->c").unwrap();
        assert_eq!(out, "a b c");
    }

    #[test]
    fn false_branch_drops() {
        let out = compile("a TOK<!-- IF false -->b TOK<!-- END IF -->c").unwrap();
        assert_eq!(out, "a c");
    }

    #[test]
    fn else_chain_takes_first_true() {
        let source = "TOK<!-- IF false -->a TOK<!-- ELSE IF true -->b TOK<!-- ELSE -->c TOK<!-- END IF -->";
        assert_eq!(compile(source).unwrap(), "b ");
    }

    #[test]
    fn untagged_directive_is_inert() {
        let source = "x <!-- IF true -->y<!-- END IF --> z";
        assert_eq!(compile(source).unwrap(), source);
    }

    #[test]
    fn nested_conditionals() {
        let source = "TOK<!-- IF true -->a TOK<!-- IF false -->b TOK<!-- END IF -->c TOK<!-- END IF -->";
        assert_eq!(compile(source).unwrap(), "a c ");
    }

    #[test]
    fn unterminated_if_is_an_error() {
        let err = compile("TOK<!-- IF true -->a").unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnterminatedConditional { .. }
        ));
    }

    #[test]
    fn dangling_end_if_is_an_error() {
        let err = compile("a TOK<!-- END IF -->").unwrap_err();
        assert!(matches!(err, RenderError::DanglingConditional { .. }));
    }

    #[test]
    fn evaluator_rejection_surfaces() {
        let err = compile("TOK<!-- IF weather -->a TOK<!-- END IF -->").unwrap_err();
        assert!(matches!(err, RenderError::Condition { .. }));
    }
}
