// Template: an immutable list of chunks expanded against a variable map

use log::{debug, trace};
use std::fmt;

use super::chunk::{Expression, Literal, TemplateChunk};
use super::encoding::{self, Charset};
use super::expression::Expressions;
use super::tokenizer::ChunkTokenizer;
use super::Variables;
use crate::error::{Result, TemplateError};

/// What happens to expressions without a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionOptions {
    /// Unresolved expressions stay in the output as encoded literal text
    AllowUnresolved,
    /// Unresolved expressions are removed from the output
    Required,
}

/// Whether literals and values are pct-encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingOptions {
    Required,
    NotRequired,
}

impl EncodingOptions {
    pub fn is_encoding_required(&self) -> bool {
        matches!(self, EncodingOptions::Required)
    }
}

/// Which characters a literal keeps unencoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralEncoding {
    /// Every RFC 3986 reserved character
    Reserved,
    Path,
    Query,
}

impl LiteralEncoding {
    fn encode(&self, value: &str, charset: Charset) -> String {
        match self {
            LiteralEncoding::Reserved => encoding::encode(value, charset, true),
            LiteralEncoding::Path => encoding::path_encode(value, charset),
            LiteralEncoding::Query => encoding::query_encode(value, charset),
        }
    }
}

/// Settings shared by every template flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    pub expansion: ExpansionOptions,
    pub encoding: EncodingOptions,
    pub encode_slash: bool,
    pub charset: Charset,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            expansion: ExpansionOptions::Required,
            encoding: EncodingOptions::Required,
            encode_slash: true,
            charset: Charset::Utf8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    template: String,
    options: TemplateOptions,
    literal_encoding: LiteralEncoding,
    chunks: Vec<TemplateChunk>,
}

impl Template {
    /// Parse a template. Literals keep every reserved character.
    pub fn new(value: &str, options: TemplateOptions) -> Result<Self> {
        if value.is_empty() {
            return Err(TemplateError::Required("template"));
        }
        Ok(Self::parse(value, options, LiteralEncoding::Reserved))
    }

    /// Parse a template without the empty check
    pub(crate) fn parse(value: &str, options: TemplateOptions, literal_encoding: LiteralEncoding) -> Self {
        let mut template = Self {
            template: value.to_string(),
            options,
            literal_encoding,
            chunks: Vec::new(),
        };
        template.chunks = template.parse_fragment(value, literal_encoding);
        template
    }

    /// Parse a template made of fragments that each encode their literals differently
    pub(crate) fn parse_fragments(
        value: &str,
        fragments: &[(&str, LiteralEncoding)],
        options: TemplateOptions,
    ) -> Self {
        let mut template = Self {
            template: value.to_string(),
            options,
            literal_encoding: LiteralEncoding::Reserved,
            chunks: Vec::new(),
        };
        template.chunks = fragments
            .iter()
            .flat_map(|(fragment, literal_encoding)| template.parse_fragment(fragment, *literal_encoding))
            .collect();
        template
    }

    /// Build a template from chunks that were already parsed
    pub fn from_chunks(chunks: Vec<TemplateChunk>, options: TemplateOptions) -> Self {
        let template = chunks.iter().map(TemplateChunk::value).collect();
        Self {
            template,
            options,
            literal_encoding: LiteralEncoding::Reserved,
            chunks,
        }
    }

    fn parse_fragment(&self, fragment: &str, literal_encoding: LiteralEncoding) -> Vec<TemplateChunk> {
        ChunkTokenizer::new(fragment)
            .map(|token| {
                if token.starts_with('{') {
                    if let Some(expression) = Expressions::create(token) {
                        return TemplateChunk::Expression(expression);
                    }
                    trace!("'{}' is not a valid expression, keeping it as a literal", token);
                }
                TemplateChunk::Literal(Literal::new(self.encode_literal(token, literal_encoding)))
            })
            .collect()
    }

    fn encode_literal(&self, value: &str, literal_encoding: LiteralEncoding) -> String {
        if self.options.encoding.is_encoding_required() {
            literal_encoding.encode(value, self.options.charset)
        } else {
            value.to_string()
        }
    }

    /// Expand the template. Unresolved expressions are handled per the
    /// template's `ExpansionOptions`.
    pub fn expand(&self, variables: &Variables) -> Result<String> {
        Ok(self.resolve(variables)?.unwrap_or_default())
    }

    /// Expand the template, returning `None` when nothing at all resolved
    pub fn resolve(&self, variables: &Variables) -> Result<Option<String>> {
        let mut resolved: Option<String> = None;
        for chunk in &self.chunks {
            let expanded = match chunk {
                TemplateChunk::Literal(literal) => Some(literal.value().to_string()),
                TemplateChunk::Expression(expression) => {
                    self.resolve_expression(expression, variables)?
                }
            };
            if let Some(expanded) = expanded {
                resolved.get_or_insert_with(String::new).push_str(&expanded);
            }
        }
        Ok(resolved)
    }

    fn resolve_expression(
        &self,
        expression: &Expression,
        variables: &Variables,
    ) -> Result<Option<String>> {
        match variables.get(expression.name()).filter(|value| !value.is_null()) {
            Some(value) => {
                let expanded = expression.expand(
                    value,
                    self.options.encoding.is_encoding_required(),
                    self.options.charset,
                )?;
                Ok(expanded.map(|expanded| {
                    if self.options.encode_slash {
                        expanded
                    } else {
                        debug!("Explicit slash decoding specified, decoding all slashes in {}", expression);
                        expanded.replace("%2F", "/")
                    }
                }))
            }
            None if self.allow_unresolved() => Ok(Some(
                self.encode_literal(&expression.to_string(), self.literal_encoding),
            )),
            None => Ok(None),
        }
    }

    /// Variable names in the template, in order, duplicates included
    pub fn variables(&self) -> Vec<&str> {
        self.chunks
            .iter()
            .filter_map(|chunk| match chunk {
                TemplateChunk::Expression(expression) => Some(expression.name()),
                TemplateChunk::Literal(_) => None,
            })
            .collect()
    }

    /// Literal values in the template, in order
    pub fn literals(&self) -> Vec<&str> {
        self.chunks
            .iter()
            .filter_map(|chunk| match chunk {
                TemplateChunk::Literal(literal) => Some(literal.value()),
                TemplateChunk::Expression(_) => None,
            })
            .collect()
    }

    /// True when the template has no expressions
    pub fn is_literal(&self) -> bool {
        self.variables().is_empty()
    }

    pub fn chunks(&self) -> &[TemplateChunk] {
        &self.chunks
    }

    /// The source string the template was parsed from
    pub fn source(&self) -> &str {
        &self.template
    }

    pub fn options(&self) -> TemplateOptions {
        self.options
    }

    pub fn allow_unresolved(&self) -> bool {
        self.options.expansion == ExpansionOptions::AllowUnresolved
    }

    pub fn encode_slash(&self) -> bool {
        self.options.encode_slash
    }

    pub fn charset(&self) -> Charset {
        self.options.charset
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.chunks {
            f.write_str(&chunk.value())?;
        }
        Ok(())
    }
}
