// Percent-encoding for path, query and query parameter contexts
//
// Already pct-encoded runs (`%XX`) are copied through untouched so that a
// value encoded twice comes out the same as a value encoded once.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// RFC 3986 gen-delims and sub-delims
const RESERVED_CHARACTERS: &str = ":/?#[]@!$&'()*+,;=";

/// pchar plus `/` and `?`
const PATH_RESERVED_CHARACTERS: &str = "/?:@!$&'()*+,;=";

/// Characters that keep their meaning in a full query string. `+` is left
/// out since form decoders read it as a space.
const QUERY_RESERVED_CHARACTERS: &str = "/?:@!$&'()*,;=";

/// Characters that may appear raw inside a single query parameter name or value
const QUERY_PARAM_RESERVED_CHARACTERS: &str = "/:@!'()*";

/// Character set used to turn text into bytes before pct-encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    #[serde(rename = "utf-8", alias = "UTF-8")]
    Utf8,
    #[serde(rename = "iso-8859-1", alias = "ISO-8859-1")]
    Iso8859_1,
}

impl Charset {
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// Encode text into bytes. Characters outside ISO-8859-1 become `?`.
    pub fn to_bytes<'a>(&self, value: &'a str) -> Cow<'a, [u8]> {
        match self {
            Charset::Utf8 => Cow::Borrowed(value.as_bytes()),
            Charset::Iso8859_1 if value.is_ascii() => Cow::Borrowed(value.as_bytes()),
            Charset::Iso8859_1 => Cow::Owned(
                value
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                    .collect(),
            ),
        }
    }

    /// Decode bytes back into text, `None` if the bytes are not valid in this charset
    pub fn from_bytes(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Charset::Iso8859_1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the byte offset of every `%XX` sequence in the value
fn pct_encoded_offsets(value: &str) -> Vec<usize> {
    let bytes = value.as_bytes();
    let mut offsets = Vec::new();
    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b'%' && bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit()
        {
            offsets.push(i);
            i += 3;
        } else {
            i += 1;
        }
    }
    offsets
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Determines if the value is already pct-encoded: only unreserved characters
/// and `%`, with at least one valid `%XX` sequence.
///
/// This is a standalone check for callers holding user supplied values.
/// The encoders do not consult it; [`encode_reserved`] copies each `%XX` run
/// through on its own, so a value this accepts encodes to itself.
pub fn is_encoded(value: &str) -> bool {
    value.bytes().all(|b| is_unreserved(b) || b == b'%') && !pct_encoded_offsets(value).is_empty()
}

/// Uri encode the value. With `allow_reserved` every RFC 3986 reserved
/// character is kept as-is, otherwise only unreserved characters are.
pub fn encode(value: &str, charset: Charset, allow_reserved: bool) -> String {
    let reserved = if allow_reserved { RESERVED_CHARACTERS } else { "" };
    encode_reserved(value, reserved, charset)
}

/// Uri encode a path fragment
pub fn path_encode(path: &str, charset: Charset) -> String {
    encode_reserved(path, PATH_RESERVED_CHARACTERS, charset)
}

/// Uri encode a full query string fragment, keeping `&`, `=` and `?`
pub fn query_encode(query: &str, charset: Charset) -> String {
    encode_reserved(query, QUERY_RESERVED_CHARACTERS, charset)
}

/// Uri encode a single query parameter name or value
pub fn query_param_encode(value: &str, charset: Charset) -> String {
    encode_reserved(value, QUERY_PARAM_RESERVED_CHARACTERS, charset)
}

/// Encodes the value, preserving the `reserved` characters and any run that is
/// already pct-encoded.
pub fn encode_reserved(value: &str, reserved: &str, charset: Charset) -> String {
    let offsets = pct_encoded_offsets(value);
    if offsets.is_empty() {
        return encode_chunk(value, reserved, charset);
    }

    let mut encoded = String::with_capacity(value.len() + 8);
    let mut index = 0;
    for start in offsets {
        encoded.push_str(&encode_chunk(&value[index..start], reserved, charset));
        encoded.push_str(&value[start..start + 3]);
        index = start + 3;
    }
    encoded.push_str(&encode_chunk(&value[index..], reserved, charset));
    encoded
}

/// Encode a chunk that contains no `%XX` runs
fn encode_chunk(value: &str, reserved: &str, charset: Charset) -> String {
    let mut encoded = String::with_capacity(value.len() + 8);
    let mut run_start = 0;
    for (i, c) in value.char_indices() {
        if reserved.contains(c) {
            if run_start < i {
                encoded.push_str(&encode_run(&value[run_start..i], charset));
            }
            encoded.push(c);
            run_start = i + c.len_utf8();
        }
    }
    if run_start < value.len() {
        encoded.push_str(&encode_run(&value[run_start..], charset));
    }
    encoded
}

fn encode_run(value: &str, charset: Charset) -> String {
    urlencoding::encode_binary(&charset.to_bytes(value)).into_owned()
}

/// Uri decode the value. Values that do not decode in the charset are
/// returned unchanged.
pub fn decode(value: &str, charset: Charset) -> String {
    let bytes = urlencoding::decode_binary(value.as_bytes());
    charset
        .from_bytes(&bytes)
        .unwrap_or_else(|| value.to_string())
}
