// Body templates: unencoded text where unresolved expressions are kept

use std::fmt;

use super::base::{EncodingOptions, ExpansionOptions, LiteralEncoding, Template, TemplateOptions};
use super::encoding::Charset;
use super::Variables;
use crate::error::{Result, TemplateError};

const JSON_TOKEN_START: &str = "{";
const JSON_TOKEN_END: &str = "}";
const JSON_TOKEN_START_ENCODED: &str = "%7B";
const JSON_TOKEN_END_ENCODED: &str = "%7D";

/// A request body template. A body written as `%7B...%7D` is a json object
/// whose outer braces were escaped to keep them away from the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTemplate {
    template: Template,
    json: bool,
}

impl BodyTemplate {
    pub fn create(template: &str, charset: Charset) -> Result<Self> {
        if template.is_empty() {
            return Err(TemplateError::Required("template"));
        }

        let options = TemplateOptions {
            expansion: ExpansionOptions::AllowUnresolved,
            encoding: EncodingOptions::NotRequired,
            encode_slash: false,
            charset,
        };

        Ok(Self {
            template: Template::parse(template, options, LiteralEncoding::Reserved),
            json: template.starts_with(JSON_TOKEN_START_ENCODED)
                && template.ends_with(JSON_TOKEN_END_ENCODED),
        })
    }

    pub fn expand(&self, variables: &Variables) -> Result<String> {
        let expanded = self.template.expand(variables)?;
        if !self.json {
            return Ok(expanded);
        }

        // restore the outer braces once, whatever the body contains
        let start = expanded.find(JSON_TOKEN_START_ENCODED);
        let end = expanded.rfind(JSON_TOKEN_END_ENCODED);
        match (start, end) {
            (Some(start), Some(end)) if start + JSON_TOKEN_START_ENCODED.len() <= end => {
                let inner = &expanded[start + JSON_TOKEN_START_ENCODED.len()..end];
                Ok(format!("{}{}{}", JSON_TOKEN_START, inner, JSON_TOKEN_END))
            }
            _ => Ok(expanded),
        }
    }

    pub fn variables(&self) -> Vec<&str> {
        self.template.variables()
    }

    pub fn is_literal(&self) -> bool {
        self.template.is_literal()
    }

    pub fn charset(&self) -> Charset {
        self.template.charset()
    }
}

impl fmt::Display for BodyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.template, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::variables;
    use serde_json::json;

    fn expand(template: &str, vars: serde_json::Value) -> String {
        BodyTemplate::create(template, Charset::Utf8)
            .unwrap()
            .expand(&variables(vars))
            .unwrap()
    }

    #[test]
    fn test_json_body_is_unwrapped() {
        assert_eq!(
            expand("%7B\"width\":{size}%7D", json!({"size": "100"})),
            "{\"width\":100}"
        );
    }

    #[test]
    fn test_inner_braces_are_untouched() {
        assert_eq!(
            expand(
                "%7B\"customer\":%7B\"name\":\"{name}\"%7D%7D",
                json!({"name": "Denominator"})
            ),
            "{\"customer\":%7B\"name\":\"Denominator\"%7D}"
        );
    }

    #[test]
    fn test_values_are_not_encoded() {
        assert_eq!(
            expand("user={user} & pass={pass}", json!({"user": "a b", "pass": "c/d"})),
            "user=a b & pass=c/d"
        );
    }

    #[test]
    fn test_unresolved_expressions_are_kept() {
        assert_eq!(
            expand("%7B\"a\":\"{a}\",\"b\":\"{b}\"%7D", json!({"a": "x"})),
            "{\"a\":\"x\",\"b\":\"{b}\"}"
        );
    }

    #[test]
    fn test_plain_body() {
        let template = BodyTemplate::create("hello {name}", Charset::Utf8).unwrap();
        assert_eq!(template.variables(), vec!["name"]);
        assert_eq!(template.expand(&variables(json!({"name": "world"}))).unwrap(), "hello world");
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert!(BodyTemplate::create("", Charset::Utf8).is_err());
    }
}
