//! Formatter registry for value transformations.
//!
//! A placeholder may carry a formatter tag: `${(Upper)NAME}` resolves the
//! value for `NAME` and passes it through the `Upper` formatter before
//! substitution. Formatters are constructed once per name and cached for
//! the session; the reserved `Block` tag never formats.

use std::cell::RefCell;
use std::collections::HashMap;

/// A named, pluggable string transformation.
pub trait ValueFormatter {
    /// Transform a resolved value before substitution.
    fn format_value(&self, value: &str) -> String;
}

/// Constructor for a formatter instance.
pub type FormatterFactory = fn() -> Box<dyn ValueFormatter>;

/// Registry mapping formatter names to constructors.
///
/// Instances are built lazily on first dispatch and memoized per name.
/// The default registry carries the built-in formatters (`Upper`, `Lower`,
/// `Capitalize`, `Trim`, `Html`); custom formatters are added with
/// [`register`](FormatterRegistry::register).
pub struct FormatterRegistry {
    factories: HashMap<String, FormatterFactory>,
    instances: RefCell<HashMap<String, Box<dyn ValueFormatter>>>,
}

impl FormatterRegistry {
    /// Create a registry with the built-in formatters registered.
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
            instances: RefCell::new(HashMap::new()),
        };
        registry.register("Upper", || Box::new(Upper));
        registry.register("Lower", || Box::new(Lower));
        registry.register("Capitalize", || Box::new(Capitalize));
        registry.register("Trim", || Box::new(Trim));
        registry.register("Html", || Box::new(Html));
        registry
    }

    /// Register a formatter constructor under a name.
    ///
    /// Re-registering a name replaces the constructor and drops any cached
    /// instance.
    pub fn register(&mut self, name: impl Into<String>, factory: FormatterFactory) {
        let name = name.into();
        self.instances.borrow_mut().remove(&name);
        self.factories.insert(name, factory);
    }

    /// Check whether a formatter name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered formatter names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Format a value through the named formatter.
    ///
    /// Returns `None` when the name is unknown. The instance is constructed
    /// on first use and reused afterwards.
    pub fn format(&self, name: &str, value: &str) -> Option<String> {
        let factory = self.factories.get(name)?;
        let mut instances = self.instances.borrow_mut();
        let formatter = instances.entry(name.to_string()).or_insert_with(*factory);
        Some(formatter.format_value(value))
    }

    /// Drop all cached instances. Called when a new render session starts.
    pub(crate) fn clear_cache(&self) {
        self.instances.borrow_mut().clear();
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Built-in formatters
// =============================================================================

struct Upper;

impl ValueFormatter for Upper {
    fn format_value(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

struct Lower;

impl ValueFormatter for Lower {
    fn format_value(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

struct Capitalize;

impl ValueFormatter for Capitalize {
    fn format_value(&self, value: &str) -> String {
        let mut chars = value.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

struct Trim;

impl ValueFormatter for Trim {
    fn format_value(&self, value: &str) -> String {
        value.trim().to_string()
    }
}

/// Escapes HTML-significant characters for safe interpolation into markup.
struct Html;

impl ValueFormatter for Html {
    fn format_value(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                other => escaped.push(other),
            }
        }
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = FormatterRegistry::new();
        for name in ["Upper", "Lower", "Capitalize", "Trim", "Html"] {
            assert!(registry.has(name), "missing builtin {name}");
        }
    }

    #[test]
    fn dispatch_formats_values() {
        let registry = FormatterRegistry::new();
        assert_eq!(registry.format("Upper", "abc"), Some("ABC".to_string()));
        assert_eq!(registry.format("Capitalize", "abc"), Some("Abc".to_string()));
        assert_eq!(registry.format("Trim", "  x "), Some("x".to_string()));
        assert_eq!(
            registry.format("Html", "<b>&</b>"),
            Some("&lt;b&gt;&amp;&lt;/b&gt;".to_string())
        );
        assert_eq!(registry.format("Nope", "x"), None);
    }

    #[test]
    fn custom_formatters_can_be_registered() {
        struct Reverse;
        impl ValueFormatter for Reverse {
            fn format_value(&self, value: &str) -> String {
                value.chars().rev().collect()
            }
        }

        let mut registry = FormatterRegistry::new();
        registry.register("Reverse", || Box::new(Reverse));
        assert_eq!(registry.format("Reverse", "abc"), Some("cba".to_string()));
    }
}
