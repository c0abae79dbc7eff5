// Query templates: one query parameter with zero or more value templates

use std::fmt;

use super::base::{EncodingOptions, ExpansionOptions, LiteralEncoding, Template, TemplateOptions};
use super::collection_format::CollectionFormat;
use super::encoding::Charset;
use super::Variables;
use crate::error::{Result, TemplateError};

/// A single query parameter, `name=value&name=value` or a pure `name`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    name: Template,
    values: Vec<String>,
    templates: Vec<Template>,
    collection_format: CollectionFormat,
    decode_slash: bool,
}

impl QueryTemplate {
    /// Create an exploded query template
    pub fn create<S: AsRef<str>>(name: &str, values: &[S], charset: Charset) -> Result<Self> {
        Self::create_with(name, values, charset, CollectionFormat::Exploded, true)
    }

    /// Create a query template. Blank values are dropped; when none remain
    /// the parameter is pure and renders as its name alone.
    pub fn create_with<S: AsRef<str>>(
        name: &str,
        values: &[S],
        charset: Charset,
        collection_format: CollectionFormat,
        decode_slash: bool,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(TemplateError::Required("name"));
        }

        let name_options = TemplateOptions {
            expansion: ExpansionOptions::AllowUnresolved,
            encoding: EncodingOptions::Required,
            encode_slash: false,
            charset,
        };
        let value_options = TemplateOptions {
            expansion: ExpansionOptions::Required,
            encoding: EncodingOptions::Required,
            encode_slash: !decode_slash,
            charset,
        };

        let values: Vec<String> = values
            .iter()
            .map(AsRef::as_ref)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
            .collect();
        let templates = values
            .iter()
            .map(|value| Template::parse(value, value_options, LiteralEncoding::Reserved))
            .collect();

        Ok(Self {
            name: Template::parse(name, name_options, LiteralEncoding::Reserved),
            values,
            templates,
            collection_format,
            decode_slash,
        })
    }

    /// A new template carrying this template's values followed by `values`
    pub fn append<S: AsRef<str>>(
        &self,
        values: &[S],
        collection_format: CollectionFormat,
        decode_slash: bool,
    ) -> Result<Self> {
        let combined: Vec<&str> = self
            .values
            .iter()
            .map(String::as_str)
            .chain(values.iter().map(AsRef::as_ref))
            .collect();
        Self::create_with(
            self.name.source(),
            &combined,
            self.charset(),
            collection_format,
            decode_slash,
        )
    }

    /// Expand into a query string fragment. `None` means the parameter must
    /// be left out of the query string entirely.
    pub fn expand(&self, variables: &Variables) -> Result<Option<String>> {
        if self.is_pure() {
            // a pure parameter is only present once its name resolves
            let resolved = self
                .name
                .variables()
                .iter()
                .all(|name| variables.get(*name).is_some_and(|value| !value.is_null()));
            return resolved.then(|| self.name.expand(variables)).transpose();
        }

        let name = self.name.expand(variables)?;
        let mut resolved = Vec::new();
        for template in &self.templates {
            if let Some(expanded) = template.resolve(variables)? {
                resolved.extend(split_values(&expanded));
            }
        }

        if resolved.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.collection_format.join(&name, &resolved, self.charset())))
    }

    /// The unexpanded parameter name
    pub fn name(&self) -> &str {
        self.name.source()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Variables of the name followed by those of every value
    pub fn variables(&self) -> Vec<&str> {
        self.name
            .variables()
            .into_iter()
            .chain(self.templates.iter().flat_map(Template::variables))
            .collect()
    }

    pub fn is_pure(&self) -> bool {
        self.values.is_empty()
    }

    pub fn collection_format(&self) -> CollectionFormat {
        self.collection_format
    }

    pub fn decode_slash(&self) -> bool {
        self.decode_slash
    }

    pub fn charset(&self) -> Charset {
        self.name.charset()
    }
}

/// Split an expanded value on the commas left by collection expansion.
/// Trailing empty parts are dropped, an empty value stays as one empty part.
fn split_values(expanded: &str) -> Vec<String> {
    if expanded.is_empty() {
        return vec![String::new()];
    }
    let mut parts: Vec<String> = expanded.split(',').map(str::to_string).collect();
    while parts.last().is_some_and(String::is_empty) {
        parts.pop();
    }
    parts
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pure() {
            return fmt::Display::fmt(&self.name, f);
        }
        let values: Vec<String> = self.templates.iter().map(Template::to_string).collect();
        f.write_str(&self.collection_format.join(&self.name.to_string(), &values, self.charset()))
    }
}
