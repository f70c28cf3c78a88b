use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::parser::{Placeholder, PlaceholderKind, scan_placeholders};
use crate::render::error::{RenderError, compute_suggestions};
use crate::types::Value;

/// A parsed template: a document, or a block extracted from one.
///
/// A root template is produced by the engine's load methods; child blocks
/// are owned by their parent until [`fetch`](Template::fetch)ed, at which
/// point the caller receives an independent deep copy that can be assigned
/// to and handed back without aliasing the parent. Cloning a template is
/// always a deep copy of its subtree, so a repeated block can be fetched
/// once and cloned per repetition.
///
/// # Example
///
/// ```
/// use weft::Engine;
///
/// let mut engine = Engine::new();
/// let mut page = engine
///     .load_from_str("Hello ${NAME}! <!-- BEGIN ITEM -->- ${ITEM}<!-- END ITEM -->")
///     .unwrap();
///
/// page.assign("NAME", "World");
/// for label in ["a", "b"] {
///     let mut item = page.fetch("ITEM").unwrap();
///     item.assign("ITEM", label);
///     page.assign("ITEM", item);
/// }
///
/// assert_eq!(engine.render(&page).unwrap(), "Hello World! - a- b");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Template {
    /// Compiled source: block regions replaced by `${(Block)name}`,
    /// conditional markers token-tagged.
    source: String,
    /// Child blocks by name, one entry per outermost block region.
    blocks: BTreeMap<String, Template>,
    /// Ordered value sequences per variable name.
    assigns: HashMap<String, Vec<Value>>,
    /// Single-valued, unformatted assignments.
    fast_assigns: HashMap<String, String>,
    /// Values propagated to direct block children at render time.
    block_assigns: HashMap<String, String>,
    /// Fast values propagated to direct block children at render time.
    block_fast_assigns: HashMap<String, String>,
}

impl Template {
    pub(crate) fn empty() -> Template {
        Template::default()
    }

    pub(crate) fn set_source(&mut self, source: String) {
        self.source = source;
    }

    pub(crate) fn insert_block(&mut self, name: String, block: Template) {
        self.blocks.insert(name, block);
    }

    /// The compiled source text of this template.
    pub fn source(&self) -> &str {
        &self.source
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Fetch an independent copy of a direct child block.
    ///
    /// The returned template is decoupled from this one: assignments made to
    /// either side are invisible to the other. Fetching an undeclared block
    /// name is a hard error carrying close-name suggestions.
    pub fn fetch(&self, name: &str) -> Result<Template, RenderError> {
        match self.blocks.get(name) {
            Some(block) => Ok(block.clone()),
            None => {
                let available: Vec<String> = self.blocks.keys().cloned().collect();
                Err(RenderError::UnknownBlock {
                    name: name.to_string(),
                    suggestions: compute_suggestions(name, &available),
                    available,
                })
            }
        }
    }

    /// Block names declared in this template.
    ///
    /// With `include_nested`, names from nested blocks are included too.
    pub fn block_names(&self, include_nested: bool) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = scan_placeholders(&self.source)
            .into_iter()
            .filter(Placeholder::is_block)
            .map(|p| p.name)
            .collect();

        if include_nested {
            for block in self.blocks.values() {
                names.extend(block.block_names(true));
            }
        }

        names
    }

    // =========================================================================
    // Assignment
    // =========================================================================

    /// Append a value to the ordered sequence for `name`.
    ///
    /// Assigning the same name repeatedly renders each value in assignment
    /// order, which is how a block is repeated N times.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.assigns.entry(name.into()).or_default().push(value.into());
    }

    /// Replace the value sequence for `name` with a single value.
    pub fn reassign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.assigns.insert(name.into(), vec![value.into()]);
    }

    /// Append every (name, value) pair, in order.
    ///
    /// Pairs come from any iterator; the [`assigns!`](crate::assigns) macro
    /// builds one inline.
    pub fn assign_all(&mut self, pairs: impl IntoIterator<Item = (String, Value)>) {
        for (name, value) in pairs {
            self.assign(name, value);
        }
    }

    /// Set a fast (unformatted, single-valued) assignment. Always overwrites.
    pub fn assign_fast(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fast_assigns.insert(name.into(), value.into());
    }

    /// Assign a value visible to this template's direct block children.
    ///
    /// The value participates in the children's resolution during rendering
    /// instead of this template's own; it is how a parent injects a value
    /// into all of its blocks without repeating the assignment per block.
    pub fn assign_for_block(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.block_assigns.insert(name.into(), value.into());
    }

    /// Fast variant of [`assign_for_block`](Template::assign_for_block).
    pub fn assign_fast_for_block(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.block_fast_assigns.insert(name.into(), value.into());
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Variable names referenced in this template's text.
    ///
    /// Formatter tags are stripped (`${(Upper)NAME}` reports `NAME`) and
    /// block expansion points are excluded. With `include_blocks`, names
    /// from nested block templates are merged in.
    pub fn variable_names(&self, include_blocks: bool) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = scan_placeholders(&self.source)
            .into_iter()
            .filter(|p| p.kind == PlaceholderKind::Variable && !p.is_block())
            .map(|p| p.name)
            .collect();

        if include_blocks {
            for block in self.blocks.values() {
                names.extend(block.variable_names(true));
            }
        }

        names
    }

    /// Fast variable names (`#{NAME}`) referenced in this template's text.
    pub fn fast_variable_names(&self, include_blocks: bool) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = scan_placeholders(&self.source)
            .into_iter()
            .filter(|p| p.kind == PlaceholderKind::Fast)
            .map(|p| p.name)
            .collect();

        if include_blocks {
            for block in self.blocks.values() {
                names.extend(block.fast_variable_names(true));
            }
        }

        names
    }

    // =========================================================================
    // Renderer access
    // =========================================================================

    pub(crate) fn assigns(&self) -> &HashMap<String, Vec<Value>> {
        &self.assigns
    }

    pub(crate) fn fast_assigns(&self) -> &HashMap<String, String> {
        &self.fast_assigns
    }

    pub(crate) fn block_assigns(&self) -> &HashMap<String, String> {
        &self.block_assigns
    }

    pub(crate) fn block_fast_assigns(&self) -> &HashMap<String, String> {
        &self.block_fast_assigns
    }
}
