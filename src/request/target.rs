// Targets bind request templates to a base url

use super::{Request, RequestTemplate};
use crate::error::{Result, TemplateError};
use crate::template::Variables;

/// A named base url that relative request templates are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    url: String,
}

impl Target {
    /// The url must be absolute, eg `https://api.github.com`
    pub fn new(name: &str, url: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(TemplateError::Required("name"));
        }
        let parsed = url::Url::parse(url)?;
        if parsed.cannot_be_a_base() {
            return Err(TemplateError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        Ok(Self {
            name: name.to_string(),
            url: url.trim_end_matches('/').to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn apply(&self, template: &RequestTemplate) -> Result<RequestTemplate> {
        template.target(&self.url)
    }
}

/// A declared operation: a request template already bound to its target
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    name: String,
    target: Target,
    template: RequestTemplate,
}

impl Endpoint {
    pub fn new(name: &str, template: &RequestTemplate, target: &Target) -> Result<Self> {
        if name.is_empty() {
            return Err(TemplateError::Required("name"));
        }
        Ok(Self {
            name: name.to_string(),
            target: target.clone(),
            template: target.apply(template)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }

    pub fn variables(&self) -> Vec<&str> {
        self.template.variables()
    }

    pub fn request(&self, variables: &Variables) -> Result<Request> {
        self.template.resolve(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::template::variables;
    use serde_json::json;

    #[test]
    fn test_target_requires_absolute_url() {
        assert!(Target::new("github", "https://api.github.com/").is_ok());
        assert!(matches!(
            Target::new("github", "/relative"),
            Err(TemplateError::InvalidUrl(_))
        ));
        assert!(matches!(
            Target::new("mail", "mailto:someone@example.com"),
            Err(TemplateError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_target_strips_trailing_slash() {
        let target = Target::new("github", "https://api.github.com/").unwrap();
        assert_eq!(target.url(), "https://api.github.com");
    }

    #[test]
    fn test_endpoint_request() {
        let target = Target::new("github", "https://api.github.com").unwrap();
        let template = RequestTemplate::new()
            .method(HttpMethod::Get)
            .uri("/repos/{owner}/{repo}/contributors")
            .unwrap();
        let endpoint = Endpoint::new("contributors", &template, &target).unwrap();

        assert_eq!(endpoint.variables(), vec!["owner", "repo"]);
        let request = endpoint
            .request(&variables(json!({"owner": "OpenFeign", "repo": "feign"})))
            .unwrap();
        assert_eq!(
            request.url(),
            "https://api.github.com/repos/OpenFeign/feign/contributors"
        );
        assert_eq!(request.url_parsed().unwrap().host_str(), Some("api.github.com"));
    }
}
