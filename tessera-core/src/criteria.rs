//! Key/value criteria for finder and upsert helpers.
//!
//! A [`Criteria`] set is an ordered list of field/value pairs combined with
//! an implicit AND. Translated into a filter document it matches documents
//! whose fields equal the given values; translated into a fields document it
//! seeds a newly created record (the insert side of find-or-create).
//!
//! ```ignore
//! use tessera::criteria::Criteria;
//!
//! let open_bugs = Criteria::new()
//!     .with("status", "open")
//!     .with("kind", "bug")
//!     .limit(20);
//! ```

use bson::{Bson, Document};

/// An ordered set of field/value equality pairs with an optional result limit.
///
/// An empty criteria set matches every document in the collection.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pairs: Vec<(String, Bson)>,
    limit: Option<usize>,
}

impl Criteria {
    /// Creates an empty criteria set.
    pub fn new() -> Self {
        Criteria::default()
    }

    /// Appends a field/value pair.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.pairs.push((field.into(), value.into()));
        self
    }

    /// Caps the number of results finders return.
    ///
    /// Ignored by operations that return at most one record.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` when no pairs have been added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of field/value pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns the configured result limit, if any.
    pub fn limit_hint(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the raw field/value pairs in insertion order.
    pub fn pairs(&self) -> &[(String, Bson)] {
        &self.pairs
    }

    /// Translates the pairs into a filter document for the backend.
    ///
    /// Duplicate fields collapse to the last value given, matching document
    /// key semantics. An empty set produces the match-everything filter.
    pub fn to_filter(&self) -> Document {
        self.pairs
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Translates the pairs into an initial fields document for inserts.
    pub fn to_fields(&self) -> Document {
        self.to_filter()
    }
}

impl<S: Into<String>, V: Into<Bson>> FromIterator<(S, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Criteria {
            pairs: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
            limit: None,
        }
    }
}

impl<S: Into<String>, V: Into<Bson>> From<Vec<(S, V)>> for Criteria {
    fn from(pairs: Vec<(S, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn empty_criteria_match_everything() {
        let criteria = Criteria::new();

        assert!(criteria.is_empty());
        assert_eq!(criteria.to_filter(), doc! {});
    }

    #[test]
    fn pairs_translate_in_order() {
        let criteria = Criteria::new()
            .with("status", "open")
            .with("priority", 3);

        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria.to_filter(), doc! { "status": "open", "priority": 3 });
        assert_eq!(criteria.to_fields(), criteria.to_filter());
    }

    #[test]
    fn duplicate_fields_keep_the_last_value() {
        let criteria = Criteria::new()
            .with("status", "open")
            .with("status", "closed");

        assert_eq!(criteria.to_filter(), doc! { "status": "closed" });
        // The raw pairs still record both entries.
        assert_eq!(criteria.pairs().len(), 2);
    }

    #[test]
    fn criteria_from_pairs() {
        let criteria = Criteria::from(vec![("name", "alice"), ("role", "admin")]);

        assert_eq!(criteria.to_filter(), doc! { "name": "alice", "role": "admin" });
        assert_eq!(criteria.limit_hint(), None);
    }

    #[test]
    fn limit_is_carried() {
        let criteria = Criteria::new().with("status", "open").limit(5);

        assert_eq!(criteria.limit_hint(), Some(5));
    }
}
