use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::request::HttpMethod;
use crate::template::{Charset, CollectionFormat};

fn default_decode_slash() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// An api manifest: a base url and the endpoints declared against it
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ApiSettings {
    pub name: String,
    pub url: String,
    #[serde(default = "default_decode_slash", skip_serializing_if = "is_true")]
    pub decode_slash: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<Charset>,
    #[serde(default)]
    pub endpoints: Vec<EndpointSettings>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct EndpointSettings {
    pub name: String,
    #[serde(default)]
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> EndpointSettings {
        EndpointSettings {
            name: "contributors".to_string(),
            method: HttpMethod::Get,
            path: "/repos/{owner}/{repo}/contributors".to_string(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[test]
    fn test_serde() {
        let settings = ApiSettings {
            name: "github".to_string(),
            url: "https://api.github.com".to_string(),
            decode_slash: false,
            collection_format: Some(CollectionFormat::Csv),
            charset: None,
            endpoints: vec![endpoint()],
        };

        let yml = serde_yaml::to_string(&settings).unwrap();
        let deserde: ApiSettings = serde_yaml::from_str(&yml).unwrap();
        assert_eq!(settings, deserde);
    }

    #[test]
    fn test_defaults() {
        let yml = "
name: github
url: https://api.github.com
endpoints:
  - name: contributors
    path: /repos/{owner}/{repo}/contributors
";
        let settings: ApiSettings = serde_yaml::from_str(yml).unwrap();
        assert!(settings.decode_slash);
        assert_eq!(settings.collection_format, None);
        assert_eq!(settings.endpoints, vec![endpoint()]);
    }

    #[test]
    fn test_skip_default_fields_in_yaml() {
        let settings = ApiSettings {
            name: "github".to_string(),
            url: "https://api.github.com".to_string(),
            decode_slash: true,
            collection_format: None,
            charset: None,
            endpoints: vec![endpoint()],
        };

        let yml = serde_yaml::to_string(&settings).unwrap();

        // Verify that default fields are not serialized
        assert!(!yml.contains("decode_slash:"));
        assert!(!yml.contains("collection_format:"));
        assert!(!yml.contains("charset:"));
        assert!(!yml.contains("query:"));
        assert!(!yml.contains("headers:"));
        assert!(!yml.contains("body:"));

        // Verify that required fields are present
        assert!(yml.contains("name:"));
        assert!(yml.contains("url:"));
        assert!(yml.contains("path:"));
    }

    #[test]
    fn test_include_some_fields() {
        let mut with_body = endpoint();
        with_body.method = HttpMethod::Post;
        with_body.body = Some("%7B\"login\":\"{login}\"%7D".to_string());
        with_body
            .headers
            .insert("Content-Type".to_string(), vec!["application/json".to_string()]);

        let json = serde_json::to_string(&with_body).unwrap();

        assert!(json.contains("\"method\":\"POST\""));
        assert!(json.contains("\"body\""));
        assert!(json.contains("\"headers\""));
        assert!(!json.contains("\"query\""));
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let yml = "
name: bad
method: FETCH
path: /
";
        assert!(serde_yaml::from_str::<EndpointSettings>(yml).is_err());
    }

    #[test]
    fn test_charset_names() {
        let yml = "
name: legacy
url: https://legacy.example.com
charset: iso-8859-1
";
        let settings: ApiSettings = serde_yaml::from_str(yml).unwrap();
        assert_eq!(settings.charset, Some(Charset::Iso8859_1));
    }
}
