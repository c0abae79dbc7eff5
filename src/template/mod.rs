// Template module - RFC 6570 style level 1 templates for uris, queries, headers and bodies

pub mod base;
pub mod body;
pub mod chunk;
pub mod collection_format;
pub mod encoding;
pub mod expression;
pub mod header;
pub mod query;
pub mod tokenizer;
pub mod uri;

use serde_json::Value;
use std::collections::HashMap;

pub use base::{EncodingOptions, ExpansionOptions, Template, TemplateOptions};
pub use body::BodyTemplate;
pub use chunk::{Expression, Literal, TemplateChunk};
pub use collection_format::CollectionFormat;
pub use encoding::Charset;
pub use header::HeaderTemplate;
pub use query::QueryTemplate;
pub use uri::UriTemplate;

/// Values available to a template, keyed by expression name.
/// `Null` and missing entries are both unresolved.
pub type Variables = HashMap<String, Value>;

/// Build variables from a json object. Anything other than an object gives
/// an empty map.
pub fn variables(value: Value) -> Variables {
    match value {
        Value::Object(entries) => entries.into_iter().collect(),
        _ => Variables::new(),
    }
}
