pub mod cli;
pub mod config;
pub mod error;
pub mod request;
pub mod template;
pub mod transport;

pub use error::{Result, TemplateError};
pub use request::{Endpoint, HttpMethod, Request, RequestTemplate, Target};
pub use template::{
    variables, BodyTemplate, Charset, CollectionFormat, HeaderTemplate, QueryTemplate, Template,
    UriTemplate, Variables,
};
