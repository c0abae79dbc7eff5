// Expression grammar: turns a `{...}` token into an Expression
//
// Tokens that do not parse are not errors. The template keeps them as
// encoded literals, which is how literal braces end up in a template.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::chunk::Expression;

type ExpressionFactory = fn(&Captures<'_>) -> Option<Expression>;

/// Ordered (pattern, constructor) pairs, the first matching pattern wins
static EXPRESSION_GRAMMAR: Lazy<Vec<(Regex, ExpressionFactory)>> = Lazy::new(|| {
    vec![(
        Regex::new(r"^([+#./;?&]?)(.*)$").expect("valid regex"),
        simple_expression as ExpressionFactory,
    )]
});

pub struct Expressions;

impl Expressions {
    /// Parse a `{...}` token. Returns `None` when the token is not a valid
    /// expression: empty, unbalanced, nested or carrying a bad pattern.
    pub fn create(token: &str) -> Option<Expression> {
        let body = strip_braces(token)?;
        if body.is_empty() {
            return None;
        }

        EXPRESSION_GRAMMAR.iter().find_map(|(pattern, factory)| {
            pattern.captures(body).and_then(|captures| factory(&captures))
        })
    }
}

fn strip_braces(token: &str) -> Option<&str> {
    token.strip_prefix('{')?.strip_suffix('}')
}

/// Simple string expansion. A leading modifier is accepted but does not
/// change how the value expands.
fn simple_expression(captures: &Captures<'_>) -> Option<Expression> {
    let modifier = captures.get(1).and_then(|m| m.as_str().chars().next());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let (name, pattern) = match body.split_once(':') {
        Some((name, pattern)) => (name, Some(pattern)),
        None => (body, None),
    };

    // nested expressions are literals
    if name.contains('{') || name.trim().is_empty() {
        return None;
    }

    Expression::new(name, modifier, pattern)
}
