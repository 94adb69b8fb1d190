//! Bidirectional placeholder templates.
//!
//! A template is parsed once and then works in both directions: format
//! values into the placeholders, or match a formatted string back into the
//! values it was built from. [`SimpleTemplate`] uses a single positional
//! token like `{}`; [`NamedTemplate`] uses prefix/suffix placeholders like
//! `{name}` or `#[id]` that bind by name, by zero-based index, or by
//! position.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use stencil::{NamedTemplate, Value};
//!
//! let template = NamedTemplate::builder("select * from #[table] where id = #[id]")
//!     .prefix("#[")
//!     .suffix("]")
//!     .build()?;
//!
//! // Forward: values in, string out.
//! let mut values = HashMap::new();
//! values.insert("table".to_string(), Value::from("user"));
//! values.insert("id".to_string(), Value::from(1001));
//! let query = template.format_map(&values)?;
//! assert_eq!(query, "select * from user where id = 1001");
//!
//! // Backward: string in, values out.
//! let captured = template.matches(&query)?.unwrap();
//! assert_eq!(captured["table"], Some("user".to_string()));
//! assert_eq!(captured["id"], Some("1001".to_string()));
//!
//! // A string with a different shape simply does not match.
//! assert_eq!(template.matches("drop table user")?, None);
//! # Ok::<(), stencil::Error>(())
//! ```

mod error;
mod features;
mod format;
mod matcher;
mod parse;
mod template;
mod value;

pub use error::{Error, Result};
pub use features::Feature;
pub use parse::{Placeholder, PlaceholderKey, Segment};
pub use template::{NamedTemplate, NamedTemplateBuilder, SimpleTemplate, SimpleTemplateBuilder};
pub use value::{Value, ValueSource};
