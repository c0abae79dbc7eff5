// Uri templates: path and query fragments with their own literal encoding

use std::fmt;

use super::base::{EncodingOptions, ExpansionOptions, LiteralEncoding, Template, TemplateOptions};
use super::encoding::Charset;
use super::tokenizer::ChunkTokenizer;
use super::Variables;
use crate::error::{Result, TemplateError};

#[derive(Debug, Clone, PartialEq)]
pub struct UriTemplate {
    template: Template,
}

impl UriTemplate {
    /// Create a uri template that encodes slashes in values
    pub fn create(template: &str, charset: Charset) -> Result<Self> {
        Self::create_with(template, true, charset)
    }

    /// Create a uri template with an explicit slash policy. Unresolved
    /// expressions stay in the output as encoded literals.
    pub fn create_with(template: &str, encode_slash: bool, charset: Charset) -> Result<Self> {
        Self::create_with_expansion(template, encode_slash, charset, ExpansionOptions::AllowUnresolved)
    }

    /// Create a uri template choosing what happens to unresolved expressions
    pub fn create_with_expansion(
        template: &str,
        encode_slash: bool,
        charset: Charset,
        expansion: ExpansionOptions,
    ) -> Result<Self> {
        if template.is_empty() {
            return Err(TemplateError::Required("template"));
        }

        let options = TemplateOptions {
            expansion,
            encoding: EncodingOptions::Required,
            encode_slash,
            charset,
        };

        let fragments = match split_query(template) {
            (path, Some(query)) => vec![(path, LiteralEncoding::Path), (query, LiteralEncoding::Query)],
            (path, None) => vec![(path, LiteralEncoding::Path)],
        };

        Ok(Self {
            template: Template::parse_fragments(template, &fragments, options),
        })
    }

    /// Append a fragment, producing a new template parsed from this template's
    /// text plus the fragment.
    pub fn append(&self, fragment: &str) -> Result<Self> {
        let options = self.template.options();
        Self::create_with_expansion(
            &format!("{}{}", self, fragment),
            options.encode_slash,
            options.charset,
            options.expansion,
        )
    }

    pub fn expand(&self, variables: &Variables) -> Result<String> {
        self.template.expand(variables)
    }

    pub fn variables(&self) -> Vec<&str> {
        self.template.variables()
    }

    pub fn literals(&self) -> Vec<&str> {
        self.template.literals()
    }

    pub fn is_literal(&self) -> bool {
        self.template.is_literal()
    }

    pub fn encode_slash(&self) -> bool {
        self.template.encode_slash()
    }

    pub fn charset(&self) -> Charset {
        self.template.charset()
    }

    /// True when the template starts with a scheme
    pub fn is_absolute(&self) -> bool {
        self.template.source().starts_with("http")
    }

    pub fn as_template(&self) -> &Template {
        &self.template
    }
}

/// Split a uri at its query string delimiter, the first `?` outside of an
/// expression. The query part keeps its leading `?`.
pub(crate) fn split_query(uri: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    for chunk in ChunkTokenizer::new(uri) {
        let expression = chunk.starts_with('{') && chunk.ends_with('}');
        if let Some(idx) = chunk.find('?').filter(|_| !expression) {
            let (path, query) = uri.split_at(offset + idx);
            return (path, Some(query));
        }
        offset += chunk.len();
    }
    (uri, None)
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.template, f)
    }
}
