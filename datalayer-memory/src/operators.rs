//! Operator emitter for the in-memory store.
//!
//! The in-memory evaluator interprets the same document-shaped expression grammar
//! a MongoDB deployment would execute, so this emitter produces the same shape:
//! one mapping where each operator keyword is a top-level key and the most recent
//! call wins per key.

use bson::{Bson, Document, doc};

use datalayer_core::operators::Operators;

/// Operator builder for [`MemoryDataRepository`](crate::MemoryDataRepository).
#[derive(Debug, Clone, Default)]
pub struct MemoryOperators {
    operation: Document,
}

impl MemoryOperators {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn merge(mut self, key: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.operation.insert(key.into(), value);
        self
    }
}

impl Operators for MemoryOperators {
    type Operation = Document;

    fn plain(mut self, fields: Document) -> Self {
        self.operation.extend(fields);
        self
    }

    fn set(self, fields: Document) -> Self {
        self.merge("$set", fields)
    }

    fn is_in(self, field: impl Into<String>, values: Vec<Bson>) -> Self {
        self.merge(field, doc! { "$in": values })
    }

    fn search(self, text: impl Into<String>) -> Self {
        self.merge("$text", doc! { "$search": text.into() })
    }

    fn or(self, expressions: Vec<Document>) -> Self {
        self.merge(
            "$or",
            expressions
                .into_iter()
                .map(Bson::Document)
                .collect::<Vec<_>>(),
        )
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
    fn accumulates_with_last_write_wins() {
        let op = MemoryOperators::new()
            .plain(doc! { "is_test": true })
            .search("foo")
            .search("bar")
            .set(doc! { "a": 1 })
            .set(doc! { "b": 2 });

        assert_eq!(
            op.get_operation(),
            doc! {
                "is_test": true,
                "$text": { "$search": "bar" },
                "$set": { "b": 2 },
            },
        );
    }

    #[test]
    fn emits_same_shape_as_the_mongo_emitter() {
        let op = MemoryOperators::new()
            .is_in("owner_user_id", vec![Bson::from("u1"), Bson::from("u2")])
            .or(vec![doc! { "a": 1 }, doc! { "b": 2 }]);

        assert_eq!(
            op.get_operation(),
            doc! {
                "owner_user_id": { "$in": ["u1", "u2"] },
                "$or": [{ "a": 1 }, { "b": 2 }],
            },
        );
    }

    #[test]
    fn clear_discards_everything() {
        let op = MemoryOperators::new()
            .plain(doc! { "a": 1 })
            .clear();

        assert_eq!(op.get_operation(), doc! {});
    }
}
