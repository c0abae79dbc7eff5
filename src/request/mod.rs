// Request module - assembling dispatch-ready requests from templates

mod target;
mod template;

pub use target::{Endpoint, Target};
pub use template::RequestTemplate;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::template::Charset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "CONNECT" => Ok(HttpMethod::Connect),
            "OPTIONS" => Ok(HttpMethod::Options),
            "TRACE" => Ok(HttpMethod::Trace),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(format!("Invalid HTTP Method: {}", other)),
        }
    }
}

/// A fully resolved request, ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, Vec<String>)>,
    body: Option<Vec<u8>>,
    charset: Charset,
}

impl Request {
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        headers: Vec<(String, Vec<String>)>,
        body: Option<Vec<u8>>,
        charset: Charset,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
            body,
            charset,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parse the url, failing for relative or malformed urls
    pub fn url_parsed(&self) -> Result<url::Url> {
        Ok(url::Url::parse(&self.url)?)
    }

    pub fn headers(&self) -> &[(String, Vec<String>)] {
        &self.headers
    }

    /// Values of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The body decoded with the request charset
    pub fn body_text(&self) -> Option<String> {
        self.body.as_ref().and_then(|body| self.charset.from_bytes(body))
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} HTTP/1.1", self.method, self.url)?;
        for (name, values) in &self.headers {
            writeln!(f, "{}: {}", name, values.join(", "))?;
        }
        if let Some(body) = &self.body {
            writeln!(f)?;
            match self.charset.from_bytes(body) {
                Some(text) => writeln!(f, "{}", text)?,
                None => writeln!(f, "Binary data")?,
            }
        }
        Ok(())
    }
}
