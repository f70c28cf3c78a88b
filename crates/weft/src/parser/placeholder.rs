//! Placeholder scanner using winnow.
//!
//! Scans raw template text for placeholder occurrences:
//! - `${NAME}` — variable placeholder
//! - `${(Formatter)NAME}` — variable placeholder with a formatter tag
//! - `${(Block)NAME}` — block expansion point (reserved formatter tag)
//! - `#{NAME}` — fast (unformatted) placeholder
//!
//! The scanner never fails: text that does not form a well-formed
//! placeholder is passed over as literal content.

use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{any, take_while};

/// The reserved formatter tag marking a block expansion point.
pub const BLOCK_TAG: &str = "Block";

/// Which placeholder family an occurrence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// `${NAME}` or `${(Formatter)NAME}`.
    Variable,
    /// `#{NAME}`.
    Fast,
}

/// A single placeholder occurrence in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The full occurrence text, e.g. `${(Upper)NAME}`.
    pub text: String,
    /// The variable name, e.g. `NAME`.
    pub name: String,
    /// The formatter tag, if any, e.g. `Upper` (or the reserved `Block`).
    pub formatter: Option<String>,
    /// Variable or fast placeholder.
    pub kind: PlaceholderKind,
}

impl Placeholder {
    /// True if this occurrence is a block expansion point.
    pub fn is_block(&self) -> bool {
        self.formatter.as_deref() == Some(BLOCK_TAG)
    }
}

/// Scan source text and return every placeholder occurrence in order.
pub fn scan_placeholders(input: &str) -> Vec<Placeholder> {
    let mut remaining = input;
    let scanned: ModalResult<Vec<Option<Placeholder>>> =
        repeat(0.., chunk).parse_next(&mut remaining);
    match scanned {
        Ok(items) => items.into_iter().flatten().collect(),
        Err(_) => Vec::new(),
    }
}

/// Parse one unit of input: a placeholder, or a single literal character.
fn chunk(input: &mut &str) -> ModalResult<Option<Placeholder>> {
    alt((placeholder.map(Some), any.value(None))).parse_next(input)
}

fn placeholder(input: &mut &str) -> ModalResult<Placeholder> {
    alt((variable, fast)).parse_next(input)
}

/// Parse `${(Tag)NAME}` or `${NAME}`, capturing the full matched text.
fn variable(input: &mut &str) -> ModalResult<Placeholder> {
    preceded("${", terminated((opt(formatter_tag), name), '}'))
        .with_taken()
        .map(|((formatter, name), text)| Placeholder {
            text: text.to_string(),
            name: name.to_string(),
            formatter: formatter.map(str::to_string),
            kind: PlaceholderKind::Variable,
        })
        .parse_next(input)
}

/// Parse `#{NAME}`, capturing the full matched text.
fn fast(input: &mut &str) -> ModalResult<Placeholder> {
    preceded("#{", terminated(name, '}'))
        .with_taken()
        .map(|(name, text)| Placeholder {
            text: text.to_string(),
            name: name.to_string(),
            formatter: None,
            kind: PlaceholderKind::Fast,
        })
        .parse_next(input)
}

/// Parse a formatter tag: `(` alphanumeric name `)`.
fn formatter_tag<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited(
        '(',
        take_while(1.., |c: char| c.is_ascii_alphanumeric()),
        ')',
    )
    .parse_next(input)
}

/// Parse a variable name: anything up to the closing brace on one line.
fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c != '}' && c != '{' && c != '\n').parse_next(input)
}
