//! MongoDB operator emitter.
//!
//! Accumulates clauses directly into a `bson::Document`, matching MongoDB's
//! filter/update grammar where each operator keyword is a top-level key whose
//! value fully replaces any prior value for that keyword.

use bson::{Bson, Document, doc};

use datalayer_core::operators::Operators;

/// Operator builder emitting MongoDB-shaped expressions.
///
/// Construction starts from an empty expression; every call merges its clause at
/// the top level, with the most recent call winning per key.
#[derive(Debug, Clone, Default)]
pub struct MongoOperators {
    operation: Document,
}

impl MongoOperators {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operators for MongoOperators {
    type Operation = Document;

    fn plain(mut self, fields: Document) -> Self {
        for (key, value) in fields {
            self.operation.insert(key, value);
        }
        self
    }

    fn set(mut self, fields: Document) -> Self {
        self.operation.insert("$set", fields);
        self
    }

    fn is_in(mut self, field: impl Into<String>, values: Vec<Bson>) -> Self {
        self.operation
            .insert(field.into(), doc! { "$in": values });
        self
    }

    fn search(mut self, text: impl Into<String>) -> Self {
        self.operation
            .insert("$text", doc! { "$search": text.into() });
        self
    }

    fn or(mut self, expressions: Vec<Document>) -> Self {
        self.operation.insert(
            "$or",
            Bson::Array(
                expressions
                    .into_iter()
                    .map(Bson::Document)
                    .collect(),
            ),
        );
        self
    }

    fn clear(self) -> Self {
        Self::default()
    }

    fn get_operation(&self) -> Document {
        self.operation.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        assert_eq!(MongoOperators::new().get_operation(), doc! {});
    }

    #[test]
    fn plain_then_search() {
        let op = MongoOperators::new()
            .plain(doc! { "is_test": true })
            .search("foo");

        assert_eq!(
            op.get_operation(),
            doc! { "is_test": true, "$text": { "$search": "foo" } },
        );
    }

    #[test]
    fn is_in_emits_membership_clause() {
        let op = MongoOperators::new().is_in(
            "owner_user_id",
            vec![Bson::from("u1"), Bson::from("u2")],
        );

        assert_eq!(
            op.get_operation(),
            doc! { "owner_user_id": { "$in": ["u1", "u2"] } },
        );
    }

    #[test]
    fn later_set_replaces_earlier_set() {
        let op = MongoOperators::new()
            .set(doc! { "a": 1 })
            .set(doc! { "b": 2 });

        assert_eq!(op.get_operation(), doc! { "$set": { "b": 2 } });
    }

    #[test]
    fn plain_is_last_write_wins_per_key() {
        let op = MongoOperators::new()
            .plain(doc! { "a": 1, "b": 1 })
            .plain(doc! { "b": 2 });

        assert_eq!(op.get_operation(), doc! { "a": 1, "b": 2 });
    }

    #[test]
    fn or_replaces_prior_or_clause() {
        let sub_a = MongoOperators::new()
            .plain(doc! { "a": 1 })
            .get_operation();
        let sub_b = MongoOperators::new()
            .plain(doc! { "b": 2 })
            .get_operation();

        let op = MongoOperators::new()
            .or(vec![sub_a])
            .or(vec![sub_b.clone()]);

        assert_eq!(op.get_operation(), doc! { "$or": [sub_b] });
    }

    #[test]
    fn accumulation_merges_at_top_level() {
        let op = MongoOperators::new()
            .plain(doc! { "is_test": true })
            .is_in("owner_user_id", vec![Bson::from("u1")])
            .search("body text")
            .set(doc! { "name": "updated" });

        assert_eq!(
            op.get_operation(),
            doc! {
                "is_test": true,
                "owner_user_id": { "$in": ["u1"] },
                "$text": { "$search": "body text" },
                "$set": { "name": "updated" },
            },
        );
    }

    #[test]
    fn clear_resets_to_empty() {
        let op = MongoOperators::new()
            .plain(doc! { "a": 1 })
            .search("foo")
            .clear();

        assert_eq!(op.get_operation(), doc! {});
        // Clearing an already-empty builder stays empty.
        assert_eq!(op.clear().get_operation(), doc! {});
    }

    #[test]
    fn get_operation_does_not_mutate() {
        let op = MongoOperators::new().plain(doc! { "a": 1 });

        assert_eq!(op.get_operation(), op.get_operation());
        assert_eq!(op.get_operation(), doc! { "a": 1 });
    }
}
