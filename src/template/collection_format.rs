// Joining strategies for multi-valued query parameters

use serde::{Deserialize, Serialize};

use super::encoding::{query_param_encode, Charset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    /// Comma separated values, eg `foo=bar,baz`
    Csv,
    /// Space separated values, eg `foo=bar%20baz`
    Ssv,
    /// Tab separated values, eg `foo=bar%09baz`
    Tsv,
    /// Pipe separated values, eg `foo=bar%7Cbaz`
    Pipes,
    /// Parameter name repeated for each value, eg `foo=bar&foo=baz`
    #[default]
    Exploded,
}

impl CollectionFormat {
    fn separator(&self) -> Option<&'static str> {
        match self {
            CollectionFormat::Csv => Some(","),
            CollectionFormat::Ssv => Some(" "),
            CollectionFormat::Tsv => Some("\t"),
            CollectionFormat::Pipes => Some("|"),
            CollectionFormat::Exploded => None,
        }
    }

    /// Join the field and its values. Names and values are pct-encoded as
    /// query parameters; an empty value list gives an empty string.
    pub fn join(&self, field: &str, values: &[String], charset: Charset) -> String {
        if values.is_empty() {
            return String::new();
        }

        let field = query_param_encode(field, charset);
        let values = values.iter().map(|value| query_param_encode(value, charset));

        match self.separator() {
            None => values
                .map(|value| format!("{}={}", field, value))
                .collect::<Vec<_>>()
                .join("&"),
            Some(separator) => {
                let separator = match separator {
                    "," => separator.to_string(),
                    other => query_param_encode(other, charset),
                };
                let joined = values.collect::<Vec<_>>().join(&separator);
                format!("{}={}", field, joined)
            }
        }
    }
}

impl std::str::FromStr for CollectionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(CollectionFormat::Csv),
            "ssv" => Ok(CollectionFormat::Ssv),
            "tsv" => Ok(CollectionFormat::Tsv),
            "pipes" => Ok(CollectionFormat::Pipes),
            "exploded" => Ok(CollectionFormat::Exploded),
            other => Err(format!("Unknown collection format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exploded() {
        let joined = CollectionFormat::Exploded.join("name", &values(&["Bob", "James"]), Charset::Utf8);
        assert_eq!(joined, "name=Bob&name=James");
    }

    #[test]
    fn test_csv() {
        let joined = CollectionFormat::Csv.join("name", &values(&["James", "Jason"]), Charset::Utf8);
        assert_eq!(joined, "name=James,Jason");
    }

    #[test]
    fn test_csv_escapes_commas_inside_values() {
        let joined = CollectionFormat::Csv.join("name", &values(&["a,b", "c"]), Charset::Utf8);
        assert_eq!(joined, "name=a%2Cb,c");
    }

    #[test]
    fn test_other_separators_are_encoded() {
        let vals = values(&["a", "b"]);
        assert_eq!(CollectionFormat::Ssv.join("n", &vals, Charset::Utf8), "n=a%20b");
        assert_eq!(CollectionFormat::Tsv.join("n", &vals, Charset::Utf8), "n=a%09b");
        assert_eq!(CollectionFormat::Pipes.join("n", &vals, Charset::Utf8), "n=a%7Cb");
    }

    #[test]
    fn test_field_is_encoded() {
        let joined = CollectionFormat::Csv.join("collection[]", &values(&["1", "2"]), Charset::Utf8);
        assert_eq!(joined, "collection%5B%5D=1,2");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(CollectionFormat::Exploded.join("name", &[], Charset::Utf8), "");
        assert_eq!(CollectionFormat::Csv.join("name", &[], Charset::Utf8), "");
    }

    #[test]
    fn test_empty_value_keeps_equals() {
        let joined = CollectionFormat::Exploded.join("people", &values(&[""]), Charset::Utf8);
        assert_eq!(joined, "people=");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("CSV".parse::<CollectionFormat>(), Ok(CollectionFormat::Csv));
        assert!("bogus".parse::<CollectionFormat>().is_err());
    }
}
