mod template;
mod value;

pub use template::Template;
pub use value::Value;
