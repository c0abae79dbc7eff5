// Header templates: a header name and its ordered, de-duplicated values

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::base::{EncodingOptions, ExpansionOptions, LiteralEncoding, Template, TemplateOptions};
use super::chunk::TemplateChunk;
use super::encoding::Charset;
use super::Variables;
use crate::error::{Result, TemplateError};

static VALUE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r", ?").expect("valid regex"));

const HEADER_OPTIONS: TemplateOptions = TemplateOptions {
    expansion: ExpansionOptions::Required,
    encoding: EncodingOptions::NotRequired,
    encode_slash: false,
    charset: Charset::Utf8,
};

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderTemplate {
    name: String,
    values: Vec<String>,
    templates: Vec<Template>,
}

impl HeaderTemplate {
    /// Create a header template. Blank and repeated values are dropped,
    /// keeping the first occurrence of each.
    pub fn create<S: AsRef<str>>(name: &str, values: &[S]) -> Result<Self> {
        if name.is_empty() {
            return Err(TemplateError::Required("name"));
        }

        let mut unique: Vec<String> = Vec::new();
        for value in values.iter().map(AsRef::as_ref) {
            if !value.trim().is_empty() && !unique.iter().any(|v| v == value) {
                unique.push(value.to_string());
            }
        }

        let templates = unique
            .iter()
            .map(|value| Template::parse(value, HEADER_OPTIONS, LiteralEncoding::Reserved))
            .collect();

        Ok(Self {
            name: name.to_string(),
            values: unique,
            templates,
        })
    }

    /// Create a header template whose single value is made of chunks that
    /// were already parsed. Blank values leave the header without values.
    pub fn from_chunks(name: &str, chunks: Vec<TemplateChunk>) -> Result<Self> {
        if name.is_empty() {
            return Err(TemplateError::Required("name"));
        }

        let template = Template::from_chunks(chunks, HEADER_OPTIONS);
        let value = template.source().to_string();
        let (values, templates) = if value.trim().is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (vec![value], vec![template])
        };

        Ok(Self {
            name: name.to_string(),
            values,
            templates,
        })
    }

    /// A new template with a value built from parsed chunks added after the
    /// existing ones
    pub fn append_chunks(&self, chunks: Vec<TemplateChunk>) -> Result<Self> {
        let added = Self::from_chunks(&self.name, chunks)?;
        let mut next = self.clone();
        for (value, template) in added.values.into_iter().zip(added.templates) {
            if !next.values.contains(&value) {
                next.values.push(value);
                next.templates.push(template);
            }
        }
        Ok(next)
    }

    /// A new template with `values` added after the existing ones
    pub fn append<S: AsRef<str>>(&self, values: &[S]) -> Result<Self> {
        let combined: Vec<&str> = self
            .values
            .iter()
            .map(String::as_str)
            .chain(values.iter().map(AsRef::as_ref))
            .collect();
        Self::create(&self.name, &combined)
    }

    /// Expand into `name value, value`. Unresolved values vanish.
    pub fn expand(&self, variables: &Variables) -> Result<String> {
        let value = self.expand_value(variables)?;
        Ok(format!("{} {}", self.name, value).trim_end().to_string())
    }

    /// Expand the values alone, joined with `, `
    pub fn expand_value(&self, variables: &Variables) -> Result<String> {
        Ok(self.expand_values(variables)?.join(", "))
    }

    /// Expand each value on its own, leaving out the ones that did not
    /// resolve or came out empty. Trailing commas are stripped along with
    /// trailing whitespace, which a header field value cannot end with.
    /// Every remaining comma is followed by a space; spacing already present
    /// after a comma is kept as written.
    pub fn expand_values(&self, variables: &Variables) -> Result<Vec<String>> {
        let mut expanded = Vec::new();
        for template in &self.templates {
            if let Some(value) = template.resolve(variables)? {
                let trimmed = value.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
                if !trimmed.is_empty() {
                    expanded.push(VALUE_SEPARATOR.replace_all(trimmed, ", ").into_owned());
                }
            }
        }
        Ok(expanded)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn variables(&self) -> Vec<&str> {
        self.templates.iter().flat_map(Template::variables).collect()
    }
}

impl fmt::Display for HeaderTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.values.join(", "))
    }
}
