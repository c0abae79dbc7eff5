// Integration tests for query template expansion

use reqforge::{Charset, CollectionFormat, QueryTemplate};
use serde_json::json;

mod common;

const NO_VALUES: [&str; 0] = [];

#[test]
fn test_pure_parameter_law() {
    let template = QueryTemplate::create("{name}", &NO_VALUES, Charset::Utf8).unwrap();
    assert_eq!(
        template.expand(&common::vars(json!({"name": "firsts"}))).unwrap(),
        Some("firsts".to_string())
    );
    assert_eq!(template.expand(&common::vars(json!({}))).unwrap(), None);
}

#[test]
fn test_collection_join_law() {
    let template = QueryTemplate::create("people", &["{people}"], Charset::Utf8).unwrap();
    assert_eq!(
        template
            .expand(&common::vars(json!({"people": ["Bob", "James", "Jason"]})))
            .unwrap(),
        Some("people=Bob&people=James&people=Jason".to_string())
    );
}

#[test]
fn test_collection_formats() {
    let vars = common::vars(json!({"ids": ["a", "b"]}));
    let cases = [
        (CollectionFormat::Exploded, "id=a&id=b"),
        (CollectionFormat::Csv, "id=a,b"),
        (CollectionFormat::Ssv, "id=a%20b"),
        (CollectionFormat::Tsv, "id=a%09b"),
        (CollectionFormat::Pipes, "id=a%7Cb"),
    ];

    for (format, expected) in cases {
        let template =
            QueryTemplate::create_with("id", &["{ids}"], Charset::Utf8, format, true).unwrap();
        assert_eq!(template.expand(&vars).unwrap(), Some(expected.to_string()));
    }
}

#[test]
fn test_unresolved_parameter_is_absent() {
    let template = QueryTemplate::create("page", &["{page}"], Charset::Utf8).unwrap();
    assert_eq!(template.expand(&common::vars(json!({"size": 10}))).unwrap(), None);
    assert_eq!(
        template.expand(&common::vars(json!({"page": null}))).unwrap(),
        None
    );
}

#[test]
fn test_append_builds_new_instance() {
    let original = QueryTemplate::create("tag", &["rust"], Charset::Utf8).unwrap();
    let appended = original
        .append(&["{extra}"], CollectionFormat::Exploded, true)
        .unwrap();

    assert_eq!(original.values(), &["rust".to_string()]);
    assert_eq!(appended.values(), &["rust".to_string(), "{extra}".to_string()]);
    assert_eq!(
        appended
            .expand(&common::vars(json!({"extra": "http"})))
            .unwrap(),
        Some("tag=rust&tag=http".to_string())
    );
}

#[test]
fn test_map_value() {
    let template = QueryTemplate::create("filter", &["{filter}"], Charset::Utf8).unwrap();
    assert_eq!(
        template
            .expand(&common::vars(json!({"filter": {"state": "open", "label": "bug"}})))
            .unwrap(),
        Some("filter=label%3Dbug&filter=state%3Dopen".to_string())
    );
}
