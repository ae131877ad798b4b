//! Equality matching of filter documents against stored documents.
//!
//! Criteria translate into plain key/value filters, so the matcher only has
//! to answer one question: does every filter pair equal the corresponding
//! document field. Numeric BSON types are normalized before comparison so
//! `Int32(3)`, `Int64(3)` and `Double(3.0)` match each other, mirroring how
//! a real document database compares numbers.

use bson::{Bson, Document};

/// Returns `true` when every filter pair equals the corresponding field of
/// the document. An empty filter matches everything.
pub(crate) fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, expected)| {
        document
            .get(field)
            .is_some_and(|actual| values_equal(actual, expected))
    })
}

/// Structural equality with numeric normalization, applied recursively to
/// arrays and embedded documents.
fn values_equal(left: &Bson, right: &Bson) -> bool {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return a == b;
    }

    match (left, right) {
        (Bson::Array(a), Bson::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| values_equal(x, y))
        }
        (Bson::Document(a), Bson::Document(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => left == right,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn empty_filter_matches_any_document() {
        let document = doc! { "name": "alice" };

        assert!(matches_filter(&document, &doc! {}));
        assert!(matches_filter(&doc! {}, &doc! {}));
    }

    #[test]
    fn all_pairs_must_match() {
        let document = doc! { "name": "alice", "role": "admin" };

        assert!(matches_filter(&document, &doc! { "name": "alice" }));
        assert!(matches_filter(&document, &doc! { "name": "alice", "role": "admin" }));
        assert!(!matches_filter(&document, &doc! { "name": "alice", "role": "user" }));
        assert!(!matches_filter(&document, &doc! { "missing": "field" }));
    }

    #[test]
    fn numeric_types_are_normalized() {
        let document = doc! { "count": 3i32 };

        assert!(matches_filter(&document, &doc! { "count": 3i64 }));
        assert!(matches_filter(&document, &doc! { "count": 3.0 }));
        assert!(!matches_filter(&document, &doc! { "count": 4i32 }));
    }

    #[test]
    fn nested_values_compare_structurally() {
        let document = doc! {
            "tags": ["a", "b"],
            "meta": { "weight": 1i32 },
        };

        assert!(matches_filter(&document, &doc! { "tags": ["a", "b"] }));
        assert!(!matches_filter(&document, &doc! { "tags": ["b", "a"] }));
        assert!(matches_filter(&document, &doc! { "meta": { "weight": 1.0 } }));
    }
}
