// Error handling for reqforge

use thiserror::Error;

/// Errors raised while building or expanding request templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A required construction input was empty
    #[error("{0} is required.")]
    Required(&'static str),

    /// An expanded value did not fully match the expression's regex constraint
    #[error("Value {value} does not match the expression pattern: {pattern}")]
    PatternMismatch { value: String, pattern: String },

    /// A target or resolved request url could not be parsed
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The transport failed to dispatch a request
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, TemplateError>;

impl From<reqwest::Error> for TemplateError {
    fn from(err: reqwest::Error) -> Self {
        TemplateError::Transport(err.to_string())
    }
}
