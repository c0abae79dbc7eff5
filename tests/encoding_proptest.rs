// Property tests for pct-encoding

use proptest::prelude::*;
use reqforge::template::encoding::{self, Charset};
use reqforge::{UriTemplate, Variables};

proptest! {
    #[test]
    fn test_encoding_is_idempotent(value in any::<String>()) {
        let once = encoding::encode(&value, Charset::Utf8, false);
        prop_assert_eq!(encoding::encode(&once, Charset::Utf8, false), once.clone());
        prop_assert!(once.is_empty() || once.bytes().all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b)));
    }

    #[test]
    fn test_path_and_query_encoding_is_idempotent(value in "[ -~]{0,40}") {
        let path = encoding::path_encode(&value, Charset::Utf8);
        prop_assert_eq!(encoding::path_encode(&path, Charset::Utf8), path.clone());

        let query = encoding::query_encode(&value, Charset::Utf8);
        prop_assert_eq!(encoding::query_encode(&query, Charset::Utf8), query.clone());

        let param = encoding::query_param_encode(&value, Charset::Utf8);
        prop_assert_eq!(encoding::query_param_encode(&param, Charset::Utf8), param.clone());
    }

    #[test]
    fn test_encode_then_decode(value in "[a-zA-Z0-9 /?&=üß]{0,40}") {
        let encoded = encoding::encode(&value, Charset::Utf8, false);
        prop_assert_eq!(encoding::decode(&encoded, Charset::Utf8), value);
    }

    #[test]
    fn test_literal_templates_ignore_variables(literal in "/[a-z0-9 ]{0,20}") {
        let template = UriTemplate::create(&literal, Charset::Utf8).unwrap();
        prop_assert!(template.is_literal());
        prop_assert_eq!(template.expand(&Variables::new()).unwrap(), template.to_string());
    }
}
