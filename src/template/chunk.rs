// Template chunks: literal text and variable expressions

use regex::Regex;
use serde_json::Value;
use std::fmt;

use super::encoding::{self, Charset};
use crate::error::{Result, TemplateError};

const SEPARATOR: &str = ",";

/// A parsed template is an ordered list of chunks
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    Literal(Literal),
    Expression(Expression),
}

impl TemplateChunk {
    /// Text form of the chunk: the encoded literal, or `{name}` for an expression
    pub fn value(&self) -> String {
        match self {
            TemplateChunk::Literal(literal) => literal.value().to_string(),
            TemplateChunk::Expression(expression) => expression.to_string(),
        }
    }
}

/// Literal text, pct-encoded for its context when the template was parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    value: String,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A `{name}` or `{name:pattern}` expression
#[derive(Debug, Clone)]
pub struct Expression {
    name: String,
    modifier: Option<char>,
    pattern: Option<Pattern>,
}

/// Regex constraint of an expression, kept with its source text for display
#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    regex: Regex,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.modifier == other.modifier
            && self.pattern() == other.pattern()
    }
}

impl Expression {
    /// Create an expression. Returns `None` if the pattern is not a valid regex.
    pub fn new(name: &str, modifier: Option<char>, pattern: Option<&str>) -> Option<Self> {
        let pattern = match pattern {
            Some(source) => {
                // values must match the whole pattern, not just contain it
                let regex = Regex::new(&format!("^(?:{})$", source)).ok()?;
                Some(Pattern {
                    source: source.to_string(),
                    regex,
                })
            }
            None => None,
        };

        Some(Self {
            name: name.trim().to_string(),
            modifier,
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifier(&self) -> Option<char> {
        self.modifier
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.source.as_str())
    }

    /// Check an expanded value against the pattern, if there is one
    pub fn matches(&self, value: &str) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.regex.is_match(value))
    }

    /// Expand the value for this expression. `Null` values are unresolved and
    /// return `None`.
    pub fn expand(&self, value: &Value, encode: bool, charset: Charset) -> Result<Option<String>> {
        let expanded = match value {
            Value::Null => return Ok(None),
            Value::Array(values) => self.expand_iterable(values, encode, charset),
            Value::Object(entries) => self.expand_map(entries, encode, charset),
            scalar => render(scalar, encode, charset),
        };

        // the pattern is checked against the encoded value
        if !self.matches(&expanded) {
            return Err(TemplateError::PatternMismatch {
                value: expanded,
                pattern: self.pattern().unwrap_or_default().to_string(),
            });
        }
        Ok(Some(expanded))
    }

    fn expand_iterable(&self, values: &[Value], encode: bool, charset: Charset) -> String {
        let mut result = String::new();
        for value in values.iter().filter(|v| !v.is_null()) {
            let expanded = render(value, encode, charset);
            if expanded.is_empty() {
                // empty elements still leave their separator behind
                result.push_str(SEPARATOR);
            } else {
                if !result.is_empty() && result != SEPARATOR {
                    result.push_str(SEPARATOR);
                }
                result.push_str(&expanded);
            }
        }
        result
    }

    fn expand_map(
        &self,
        entries: &serde_json::Map<String, Value>,
        encode: bool,
        charset: Charset,
    ) -> String {
        entries
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    render(&Value::String(key.clone()), encode, charset),
                    render(value, encode, charset)
                )
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pattern() {
            Some(pattern) => write!(f, "{{{}:{}}}", self.name, pattern),
            None => write!(f, "{{{}}}", self.name),
        }
    }
}

/// String form of a single value, pct-encoded when requested
fn render(value: &Value, encode: bool, charset: Charset) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    if encode {
        encoding::encode(&text, charset, false)
    } else {
        text
    }
}
