pub mod parser;
pub mod render;
pub mod types;

pub use parser::{BLOCK_TAG, FsLoader, LoadError, ParseError, SourceLoader};
pub use render::{
    ConditionEval, Engine, FormatterRegistry, LiteralConditions, RenderError, ValueFormatter,
    compute_suggestions,
};
pub use types::{Template, Value};

/// Creates a `Vec<(String, Value)>` of assignment pairs.
///
/// Values are converted via `Into<Value>`, so string slices, owned strings,
/// and fetched block templates can be mixed freely. Feed the result to
/// [`Template::assign_all`].
///
/// # Example
///
/// ```
/// use weft::{Engine, assigns};
///
/// let mut engine = Engine::new();
/// let mut page = engine.load_from_str("${GREETING}, ${NAME}!").unwrap();
/// page.assign_all(assigns! { "GREETING" => "Hello", "NAME" => "World" });
/// assert_eq!(engine.render(&page).unwrap(), "Hello, World!");
/// ```
#[macro_export]
macro_rules! assigns {
    {} => {
        ::std::vec::Vec::<(::std::string::String, $crate::Value)>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut pairs = ::std::vec::Vec::<(::std::string::String, $crate::Value)>::new();
            $(
                pairs.push((
                    $key.to_string(),
                    ::std::convert::Into::<$crate::Value>::into($value),
                ));
            )+
            pairs
        }
    };
}
