//! The core resolution pass.
//!
//! Walks a template's placeholder occurrences, resolves each assigned name
//! to its replacement string (rendering block values recursively with the
//! inherited scope chain), applies formatter dispatch per occurrence, and
//! performs all substitutions in one atomic pass.

use std::collections::{HashMap, HashSet};

use crate::parser::{BLOCK_TAG, PlaceholderKind, scan_placeholders};
use crate::render::RenderError;
use crate::render::context::RenderContext;
use crate::render::formatter::FormatterRegistry;
use crate::render::scope::Scope;
use crate::render::substitute::substitute_all;
use crate::types::{Template, Value};

/// Render one template with an inherited scope, producing substituted text.
///
/// Comments, conditionals, and unassigned-placeholder stripping are root
/// concerns and happen once over the composed output; this pass only
/// substitutes values. It never mutates the template, so the same instance
/// can be rendered repeatedly under different inherited scopes.
pub(crate) fn render_template(
    template: &Template,
    scope: &Scope,
    ctx: &mut RenderContext,
    formatters: &FormatterRegistry,
    default_formatter: Option<&str>,
) -> Result<String, RenderError> {
    // Values this template's block children inherit: the chain so far,
    // overridden by this template's own for-block tables.
    let child_scope = scope.descend(template.block_assigns(), template.block_fast_assigns());

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut resolved: HashMap<String, String> = HashMap::new();

    for occurrence in scan_placeholders(template.source()) {
        if !seen.insert(occurrence.text.clone()) {
            continue;
        }

        match occurrence.kind {
            PlaceholderKind::Fast => {
                let value = template
                    .fast_assigns()
                    .get(&occurrence.name)
                    .map(String::as_str)
                    .or_else(|| scope.get_fast(&occurrence.name));
                if let Some(value) = value {
                    pairs.push((occurrence.text, value.to_string()));
                }
            }
            PlaceholderKind::Variable => {
                let replacement = match resolved.get(&occurrence.name).cloned() {
                    Some(cached) => cached,
                    None => {
                        let Some(value) = resolve_name(
                            template,
                            &occurrence.name,
                            scope,
                            &child_scope,
                            ctx,
                            formatters,
                            default_formatter,
                        )?
                        else {
                            continue;
                        };
                        resolved.insert(occurrence.name.clone(), value.clone());
                        value
                    }
                };

                let formatted = match occurrence.formatter.as_deref() {
                    Some(BLOCK_TAG) => replacement,
                    Some(name) => dispatch(formatters, name, &replacement)?,
                    None => match default_formatter {
                        Some(name) => dispatch(formatters, name, &replacement)?,
                        None => replacement,
                    },
                };

                pairs.push((occurrence.text, formatted));
            }
        }
    }

    Ok(substitute_all(template.source(), &pairs))
}

/// Resolve a variable name to its unformatted replacement string.
///
/// Local assignments win; the inherited chain (ancestor for-block values,
/// then globals) is consulted second. `None` means the name is unassigned
/// and its occurrences are left for the strip pass.
fn resolve_name(
    template: &Template,
    name: &str,
    scope: &Scope,
    child_scope: &Scope,
    ctx: &mut RenderContext,
    formatters: &FormatterRegistry,
    default_formatter: Option<&str>,
) -> Result<Option<String>, RenderError> {
    if let Some(values) = template.assigns().get(name) {
        let mut replacement = String::new();
        for value in values {
            match value {
                Value::Text(text) => replacement.push_str(text),
                Value::Block(block) => {
                    ctx.push()?;
                    let rendered =
                        render_template(block, child_scope, ctx, formatters, default_formatter)?;
                    ctx.pop();
                    replacement.push_str(&rendered);
                }
            }
        }
        return Ok(Some(replacement));
    }

    Ok(scope.get(name).map(str::to_string))
}

/// Dispatch through the registry, failing on unknown formatter names.
fn dispatch(
    formatters: &FormatterRegistry,
    name: &str,
    value: &str,
) -> Result<String, RenderError> {
    formatters
        .format(name, value)
        .ok_or_else(|| RenderError::UnknownFormatter {
            name: name.to_string(),
            available: formatters.names(),
        })
}
