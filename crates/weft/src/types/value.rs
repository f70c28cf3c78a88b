use super::Template;

/// A value assigned to a template variable.
///
/// Assignment targets own an ordered sequence of values; rendering a name
/// concatenates the rendered form of each value in assignment order. A
/// `Block` value is a template instance and renders recursively, which is
/// how repeated and nested blocks compose.
///
/// # Example
///
/// ```
/// use weft::Value;
///
/// // Strings become Value::Text
/// let greeting: Value = "Hello".into();
/// assert_eq!(greeting.as_text(), Some("Hello"));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Literal text, substituted verbatim.
    Text(String),

    /// A block instance, rendered recursively with inherited scope.
    Block(Template),
}

impl Value {
    /// Get this value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Block(_) => None,
        }
    }

    /// Get this value as a block instance, if it is one.
    pub fn as_block(&self) -> Option<&Template> {
        match self {
            Value::Block(t) => Some(t),
            Value::Text(_) => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<Template> for Value {
    fn from(t: Template) -> Self {
        Value::Block(t)
    }
}

impl From<&Template> for Value {
    fn from(t: &Template) -> Self {
        Value::Block(t.clone())
    }
}
