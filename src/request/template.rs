// Request templates: the per-endpoint aggregate of uri, query, header and body templates

use log::debug;

use super::{HttpMethod, Request};
use crate::error::Result;
use crate::template::uri::split_query;
use crate::template::{
    BodyTemplate, Charset, CollectionFormat, HeaderTemplate, QueryTemplate, TemplateChunk,
    UriTemplate, Variables,
};

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Template(BodyTemplate),
    Literal(Vec<u8>),
}

/// Everything needed to build a request, with expressions still unexpanded.
///
/// Builder methods leave `self` untouched and return a new template, so one
/// instance can be shared across threads and resolved concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTemplate {
    method: HttpMethod,
    uri: Option<UriTemplate>,
    queries: Vec<QueryTemplate>,
    headers: Vec<HeaderTemplate>,
    body: Option<Body>,
    decode_slash: bool,
    collection_format: CollectionFormat,
    charset: Charset,
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            uri: None,
            queries: Vec::new(),
            headers: Vec::new(),
            body: None,
            decode_slash: true,
            collection_format: CollectionFormat::Exploded,
            charset: Charset::Utf8,
        }
    }
}

impl RequestTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self, method: HttpMethod) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }

    pub fn charset(&self, charset: Charset) -> Self {
        Self {
            charset,
            ..self.clone()
        }
    }

    /// Slashes in expanded uri and query values stay unencoded when set.
    /// Applies to templates added after this call.
    pub fn decode_slash(&self, decode_slash: bool) -> Self {
        Self {
            decode_slash,
            ..self.clone()
        }
    }

    /// Collection format for query templates added after this call
    pub fn collection_format(&self, collection_format: CollectionFormat) -> Self {
        Self {
            collection_format,
            ..self.clone()
        }
    }

    /// Append a uri fragment. An absolute fragment replaces the current uri,
    /// a relative one gets a leading `/` unless it starts with `/`, `{`, `?`
    /// or `;`. Any query string in the fragment becomes query templates.
    pub fn uri(&self, fragment: &str) -> Result<Self> {
        let fragment = match fragment.chars().next() {
            Some('/' | '{' | '?' | ';') | None => fragment.to_string(),
            Some(_) if fragment.starts_with("http") => fragment.to_string(),
            Some(_) => format!("/{}", fragment),
        };
        let (path, query) = split_query(&fragment);
        let mut next = self.clone();

        if !path.is_empty() {
            next.uri = Some(match &self.uri {
                Some(uri) if !path.starts_with("http") => uri.append(path)?,
                _ => UriTemplate::create_with(path, !self.decode_slash, self.charset)?,
            });
        }

        match query {
            Some(query) => next.extract_queries(query),
            None => Ok(next),
        }
    }

    fn extract_queries(&self, query: &str) -> Result<Self> {
        let mut next = self.clone();
        let query = query.trim_start_matches('?');
        for parameter in query.split('&').filter(|p| !p.is_empty()) {
            next = match parameter.split_once('=') {
                Some((name, value)) => next.query(name, &[value])?,
                None => next.query::<&str>(parameter, &[])?,
            };
        }
        Ok(next)
    }

    /// Add values to a query parameter. With no values the parameter is
    /// pure, unless it already exists, in which case it is left alone.
    pub fn query<S: AsRef<str>>(&self, name: &str, values: &[S]) -> Result<Self> {
        let mut next = self.clone();
        match next.queries.iter_mut().find(|q| q.name() == name) {
            Some(existing) => {
                *existing = existing.append(values, self.collection_format, self.decode_slash)?;
            }
            None => next.queries.push(QueryTemplate::create_with(
                name,
                values,
                self.charset,
                self.collection_format,
                self.decode_slash,
            )?),
        }
        Ok(next)
    }

    /// Add values to a header. Header names compare case-insensitively and
    /// passing no values removes the header.
    pub fn header<S: AsRef<str>>(&self, name: &str, values: &[S]) -> Result<Self> {
        let mut next = self.clone();
        let position = next
            .headers
            .iter()
            .position(|h| h.name().eq_ignore_ascii_case(name));

        match (position, values.is_empty()) {
            (Some(index), true) => {
                next.headers.remove(index);
            }
            (Some(index), false) => {
                next.headers[index] = next.headers[index].append(values)?;
            }
            (None, true) => {}
            (None, false) => next.headers.push(HeaderTemplate::create(name, values)?),
        }
        Ok(next)
    }

    /// Add a header value made of chunks parsed elsewhere, eg taken from
    /// another template. Header names compare case-insensitively.
    pub fn header_chunks(&self, name: &str, chunks: Vec<TemplateChunk>) -> Result<Self> {
        let mut next = self.clone();
        match next
            .headers
            .iter_mut()
            .find(|h| h.name().eq_ignore_ascii_case(name))
        {
            Some(existing) => *existing = existing.append_chunks(chunks)?,
            None => next.headers.push(HeaderTemplate::from_chunks(name, chunks)?),
        }
        Ok(next)
    }

    pub fn body_template(&self, template: &str) -> Result<Self> {
        Ok(Self {
            body: Some(Body::Template(BodyTemplate::create(template, self.charset)?)),
            ..self.clone()
        })
    }

    /// Use a fixed body, replacing any body template
    pub fn body(&self, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(Body::Literal(body.into())),
            ..self.clone()
        }
    }

    /// Prefix a relative uri with a base url. Absolute uris are kept.
    pub fn target(&self, base_url: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        let uri = match &self.uri {
            Some(uri) if uri.is_absolute() => uri.clone(),
            Some(uri) => {
                let relative = uri.to_string();
                let separator = match relative.chars().next() {
                    Some('/') | Some('?') | None => "",
                    Some(_) => "/",
                };
                UriTemplate::create_with(
                    &format!("{}{}{}", base, separator, relative),
                    uri.encode_slash(),
                    self.charset,
                )?
            }
            None => UriTemplate::create_with(base, !self.decode_slash, self.charset)?,
        };
        Ok(Self {
            uri: Some(uri),
            ..self.clone()
        })
    }

    /// Every variable name used by the template, uri first, then queries,
    /// headers and body. Each name appears once.
    pub fn variables(&self) -> Vec<&str> {
        let uri = self.uri.iter().flat_map(UriTemplate::variables);
        let queries = self.queries.iter().flat_map(QueryTemplate::variables);
        let headers = self.headers.iter().flat_map(HeaderTemplate::variables);
        let body = self.body.iter().flat_map(|body| match body {
            Body::Template(template) => template.variables(),
            Body::Literal(_) => Vec::new(),
        });

        let mut variables: Vec<&str> = Vec::new();
        for name in uri.chain(queries).chain(headers).chain(body) {
            if !variables.contains(&name) {
                variables.push(name);
            }
        }
        variables
    }

    /// Expand every template into a request
    pub fn resolve(&self, variables: &Variables) -> Result<Request> {
        let mut url = match &self.uri {
            Some(uri) => uri.expand(variables)?,
            None => String::new(),
        };

        let mut queries = Vec::new();
        for query in &self.queries {
            if let Some(expanded) = query.expand(variables)? {
                queries.push(expanded);
            }
        }
        if !queries.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&queries.join("&"));
        }

        let mut headers = Vec::new();
        for header in &self.headers {
            let values = header.expand_values(variables)?;
            if !values.is_empty() {
                headers.push((header.name().to_string(), values));
            }
        }

        let body = match &self.body {
            Some(Body::Template(template)) => {
                let expanded = template.expand(variables)?;
                Some(self.charset.to_bytes(&expanded).into_owned())
            }
            Some(Body::Literal(bytes)) => Some(bytes.clone()),
            None => None,
        };

        debug!("Resolved {} {}", self.method, url);
        Ok(Request::new(self.method, url, headers, body, self.charset))
    }

    pub fn http_method(&self) -> HttpMethod {
        self.method
    }

    pub fn uri_template(&self) -> Option<&UriTemplate> {
        self.uri.as_ref()
    }

    pub fn queries(&self) -> &[QueryTemplate] {
        &self.queries
    }

    pub fn headers(&self) -> &[HeaderTemplate] {
        &self.headers
    }

    pub fn decodes_slash(&self) -> bool {
        self.decode_slash
    }
}
