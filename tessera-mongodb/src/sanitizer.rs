//! Key escaping for MongoDB's reserved field-name characters.
//!
//! MongoDB does not allow field names to contain dots (nested field access),
//! dollar signs (operators), or NUL bytes. User-supplied criteria and field
//! names flow straight into documents here, so keys are escaped on the way
//! in and unescaped on the way out. Values are left alone; only keys are
//! restricted.
//!
//! The escapes are percent-style and lossless: `%` itself is escaped first,
//! so unescaping is an exact inverse.

use bson::{Bson, Document};

const ESCAPES: [(&str, &str); 4] = [
    ("%", "%25"),
    (".", "%2E"),
    ("$", "%24"),
    ("\0", "%00"),
];

/// Escapes reserved characters in a single key.
pub(crate) fn escape_key(key: &str) -> String {
    ESCAPES
        .iter()
        .fold(key.to_string(), |key, (raw, escaped)| {
            key.replace(raw, escaped)
        })
}

/// Reverts [`escape_key`].
pub(crate) fn unescape_key(key: &str) -> String {
    ESCAPES
        .iter()
        .rev()
        .fold(key.to_string(), |key, (raw, escaped)| {
            key.replace(escaped, raw)
        })
}

/// Escapes the keys of a document, descending into embedded documents and
/// arrays.
pub(crate) fn escape_document(document: &Document) -> Document {
    document
        .iter()
        .map(|(key, value)| (escape_key(key), escape_value(value)))
        .collect()
}

/// Reverts [`escape_document`].
pub(crate) fn unescape_document(document: &Document) -> Document {
    document
        .iter()
        .map(|(key, value)| (unescape_key(key), unescape_value(value)))
        .collect()
}

fn escape_value(value: &Bson) -> Bson {
    match value {
        Bson::Document(doc) => Bson::Document(escape_document(doc)),
        Bson::Array(array) => Bson::Array(array.iter().map(escape_value).collect()),
        _ => value.clone(),
    }
}

/// Reverts key escaping inside a value read back from MongoDB.
pub(crate) fn unescape_value(value: &Bson) -> Bson {
    match value {
        Bson::Document(doc) => Bson::Document(unescape_document(doc)),
        Bson::Array(array) => Bson::Array(array.iter().map(unescape_value).collect()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn escaping_round_trips() {
        for key in ["plain", "dotted.key", "$operator", "50%", "%2E", "a.b$c%"] {
            assert_eq!(unescape_key(&escape_key(key)), key);
        }
    }

    #[test]
    fn escaped_keys_contain_no_reserved_characters() {
        let escaped = escape_key("price.usd$total");

        assert!(!escaped.contains('.'));
        assert!(!escaped.contains('$'));
    }

    #[test]
    fn documents_are_escaped_recursively() {
        let original = doc! {
            "outer.key": {
                "$inner": [ { "deep.key": 1 } ],
            },
            "value": "a.string$is.not.touched",
        };

        let escaped = escape_document(&original);
        assert!(escaped.contains_key("outer%2Ekey"));
        assert_eq!(
            escaped.get_str("value").unwrap(),
            "a.string$is.not.touched"
        );

        assert_eq!(unescape_document(&escaped), original);
    }
}
