// Integration tests for loading api manifests from disk

use reqforge::config::ApiSettings;
use reqforge::{CollectionFormat, HttpMethod};
use serde_json::json;

mod common;

const MANIFEST: &str = r#"
name: github
url: https://api.github.com/
collection_format: csv
endpoints:
  - name: contributors
    method: GET
    path: /repos/{owner}/{repo}/contributors
    query:
      anon: ["{anon}"]
      per_page: ["{per_page}"]
    headers:
      Accept: [application/vnd.github+json]
  - name: search
    path: /search/code?q={q}
    query:
      sort: ["{sort}"]
  - name: create_issue
    method: POST
    path: /repos/{owner}/{repo}/issues
    headers:
      Content-Type: [application/json]
    body: '%7B"title":"{title}","labels":[{labels}]%7D'
"#;

#[test]
fn test_load_manifest() {
    let file = common::write_manifest(MANIFEST);
    let settings = ApiSettings::load(file.path()).unwrap();

    assert_eq!(settings.name, "github");
    assert!(settings.decode_slash);
    assert_eq!(settings.collection_format, Some(CollectionFormat::Csv));
    assert_eq!(settings.endpoints.len(), 3);
    assert_eq!(settings.endpoints[2].method, HttpMethod::Post);
}

#[test]
fn test_resolve_endpoint_from_manifest() {
    let file = common::write_manifest(MANIFEST);
    let settings = ApiSettings::load(file.path()).unwrap();
    let endpoint = settings.endpoint("contributors").unwrap();

    let request = endpoint
        .request(&common::vars(json!({"owner": "OpenFeign", "repo": "feign", "anon": true})))
        .unwrap();
    assert_eq!(
        request.url(),
        "https://api.github.com/repos/OpenFeign/feign/contributors?anon=true"
    );
    assert_eq!(
        request.header("Accept"),
        Some(&["application/vnd.github+json".to_string()][..])
    );
}

#[test]
fn test_path_query_string_is_merged() {
    let settings = ApiSettings::from_yaml(MANIFEST).unwrap();
    let endpoint = settings.endpoint("search").unwrap();

    let request = endpoint
        .request(&common::vars(json!({"q": "addClass in:file", "sort": "indexed"})))
        .unwrap();
    assert_eq!(
        request.url(),
        "https://api.github.com/search/code?q=addClass%20in%3Afile&sort=indexed"
    );
}

#[test]
fn test_json_body_from_manifest() {
    let settings = ApiSettings::from_yaml(MANIFEST).unwrap();
    let endpoint = settings.endpoint("create_issue").unwrap();

    let request = endpoint
        .request(&common::vars(json!({
            "owner": "OpenFeign",
            "repo": "feign",
            "title": "Broken",
            "labels": ["\"bug\"", "\"docs\""]
        })))
        .unwrap();
    assert_eq!(
        request.body_text().unwrap(),
        "{\"title\":\"Broken\",\"labels\":[\"bug\",\"docs\"]}"
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yml");
    let err = ApiSettings::load(&path).unwrap_err();
    assert!(err.to_string().starts_with("Could not read file"));
}

#[test]
fn test_invalid_manifest() {
    let file = common::write_manifest("name: broken\nendpoints: {");
    let err = ApiSettings::load(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("Could not load"));
}
