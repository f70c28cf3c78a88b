//! The render session.
//!
//! `Engine` owns everything the original design kept in process-wide state:
//! global assignments, the document parameter table, the formatter registry
//! and its instance cache, the session secret token, and the pluggable
//! loader and condition evaluator. One engine is one render session;
//! concurrent rendering wants one engine per request rather than shared
//! mutable state.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bon::Builder;
use const_fnv1a_hash::fnv1a_hash_str_64;

use crate::parser::{
    FsLoader, LoadError, SourceLoader, expand_includes, extract_parameters, parse_document,
    tag_directives,
};
use crate::render::RenderError;
use crate::render::conditional::{ConditionEval, LiteralConditions, compile_conditionals};
use crate::render::context::RenderContext;
use crate::render::formatter::FormatterRegistry;
use crate::render::renderer::render_template;
use crate::render::scope::Scope;
use crate::render::substitute::{strip_comments, strip_unassigned};
use crate::types::Template;

/// A template render session.
///
/// The engine loads a root template, carries session-wide assignment scope,
/// and renders. Loading a new root resets global assignments, parameters,
/// and the formatter cache, and generates a fresh secret token — exactly
/// the lifecycle of initializing a new page render.
///
/// # Example
///
/// ```
/// use weft::Engine;
///
/// let mut engine = Engine::new();
/// let mut page = engine.load_from_str("Hello ${NAME}!").unwrap();
/// page.assign("NAME", "World");
/// assert_eq!(engine.render(&page).unwrap(), "Hello World!");
/// ```
#[derive(Builder)]
#[builder(on(String, into))]
pub struct Engine {
    /// Source loading capability for template files and includes.
    #[builder(default = Box::new(FsLoader))]
    loader: Box<dyn SourceLoader>,

    /// Host capability evaluating conditional directive expressions.
    #[builder(default = Box::new(LiteralConditions))]
    conditions: Box<dyn ConditionEval>,

    /// Formatter applied to untagged placeholders when set.
    ///
    /// Tagged placeholders always use their own formatter, and block
    /// expansion points are never formatted.
    default_formatter: Option<String>,

    /// Include recursion bound; a cyclic include set fails here.
    #[builder(default = 16)]
    max_include_depth: usize,

    /// Block instantiation recursion bound.
    #[builder(default = 64)]
    max_render_depth: usize,

    /// Formatter registry with per-name instance cache.
    #[builder(skip)]
    formatters: FormatterRegistry,

    /// Session-wide assignments, consulted last during resolution.
    #[builder(skip)]
    global_assigns: HashMap<String, String>,

    /// Session-wide fast assignments.
    #[builder(skip)]
    global_fast_assigns: HashMap<String, String>,

    /// Parameters declared by the document itself.
    #[builder(skip)]
    parameters: HashMap<String, String>,

    /// Per-session token distinguishing source directives from assigned
    /// text. Regenerated on every load.
    #[builder(skip)]
    secret_token: String,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::builder().build()
    }
}

impl Engine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load and compile a root template from a file.
    ///
    /// Includes are expanded relative to the file's directory, parameter
    /// declarations populate the session table, conditional markers are
    /// token-tagged, and blocks are discovered. Session scope from any
    /// previous load is reset.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<Template, LoadError> {
        let path = path.as_ref();
        let source = self.loader.load(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.compile_root(&source, base_dir)
    }

    /// Load and compile a root template from a string.
    ///
    /// Include directives resolve relative to the process working
    /// directory. Session scope from any previous load is reset.
    pub fn load_from_str(&mut self, source: &str) -> Result<Template, LoadError> {
        self.compile_root(source, Path::new("."))
    }

    fn compile_root(&mut self, source: &str, base_dir: &Path) -> Result<Template, LoadError> {
        self.reset_session();

        let expanded =
            expand_includes(source, base_dir, &*self.loader, self.max_include_depth)?;

        let (text, declared) = extract_parameters(&expanded);
        for (name, value) in declared {
            self.parameters.insert(name, value);
        }

        self.secret_token = generate_token();
        let tagged = tag_directives(&text, &self.secret_token);

        Ok(parse_document(tagged)?)
    }

    /// Drop all session scope carried over from a previous root template.
    fn reset_session(&mut self) {
        self.global_assigns.clear();
        self.global_fast_assigns.clear();
        self.parameters.clear();
        self.formatters.clear_cache();
        self.secret_token.clear();
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render a root template to output text.
    ///
    /// Substitutes assigned values (recursively instantiating blocks),
    /// strips whatever placeholders stayed unassigned, removes comments,
    /// compiles and evaluates conditionals, and strips the session token.
    /// The template is not mutated; rendering again is safe.
    pub fn render(&self, template: &Template) -> Result<String, RenderError> {
        let scope = Scope::root(&self.global_assigns, &self.global_fast_assigns);
        let mut ctx = RenderContext::new(self.max_render_depth);

        let text = render_template(
            template,
            &scope,
            &mut ctx,
            &self.formatters,
            self.default_formatter.as_deref(),
        )?;

        let text = strip_unassigned(&text);
        let text = strip_comments(&text);

        if self.secret_token.is_empty() {
            return Ok(text);
        }

        let text = compile_conditionals(&text, &self.secret_token, &*self.conditions)?;
        Ok(text.replace(&self.secret_token, ""))
    }

    // =========================================================================
    // Session scope
    // =========================================================================

    /// Assign a session-global value. Always single-valued; overwrites.
    pub fn assign_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.global_assigns.insert(name.into(), value.into());
    }

    /// Assign a session-global fast value. Always overwrites.
    pub fn assign_fast_global(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.global_fast_assigns.insert(name.into(), value.into());
    }

    /// Check assignment of `name` for `template`.
    ///
    /// Honors resolution precedence: the template's own assignments, then
    /// its for-block assignments, then session globals.
    pub fn is_assigned(&self, template: &Template, name: &str) -> bool {
        template.assigns().contains_key(name)
            || template.block_assigns().contains_key(name)
            || self.global_assigns.contains_key(name)
    }

    /// Fast-assignment variant of [`is_assigned`](Engine::is_assigned).
    pub fn is_fast_assigned(&self, template: &Template, name: &str) -> bool {
        template.fast_assigns().contains_key(name)
            || template.block_fast_assigns().contains_key(name)
            || self.global_fast_assigns.contains_key(name)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// The document parameter table.
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// Look up a required parameter. Absence is a hard error.
    pub fn parameter(&self, name: &str) -> Result<&str, RenderError> {
        self.parameters
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RenderError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// Check whether a parameter was declared or set.
    pub fn is_parameter_set(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Set a parameter value programmatically.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    // =========================================================================
    // Formatters
    // =========================================================================

    /// The formatter registry (read-only).
    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    /// The formatter registry, for registering custom formatters.
    pub fn formatters_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.formatters
    }

    /// Set or clear the default formatter for untagged placeholders.
    pub fn set_default_formatter(&mut self, name: Option<impl Into<String>>) {
        self.default_formatter = name.map(Into::into);
    }

    /// The current default formatter name, if any.
    pub fn default_formatter(&self) -> Option<&str> {
        self.default_formatter.as_deref()
    }
}

/// Process counter feeding token entropy; distinct loads hash differently
/// even within one clock tick.
static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh session token: 32 hex chars of FNV-1a over wall-clock
/// nanos and the process counter.
fn generate_token() -> String {
    let count = TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seed = format!("{nanos}:{count}");
    let high = fnv1a_hash_str_64(&seed);
    let low = fnv1a_hash_str_64(&format!("{seed}:{high}"));
    format!("{high:016x}{low:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_load() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
