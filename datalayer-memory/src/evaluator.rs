//! Interpretation of native-shaped expressions against in-memory documents.
//!
//! Implements the operator subset the builder can emit: top-level plain equality,
//! `$in` membership, `$or` over sub-expressions, `$text`/`$search` free-text
//! matching, and the `$set` update clause. Anything else is rejected as an
//! unsupported operator rather than silently ignored.

use std::cmp::Ordering;

use bson::{Bson, Document};

use datalayer_core::error::{DataRepositoryError, DataRepositoryResult};

/// Evaluates filter expressions and applies update expressions.
pub(crate) struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Returns true when the document satisfies every clause of the filter.
    ///
    /// An empty filter matches everything.
    pub(crate) fn matches(filter: &Document, document: &Document) -> DataRepositoryResult<bool> {
        for (key, condition) in filter {
            let clause_holds = match key.as_str() {
                "$or" => Self::matches_or(condition, document)?,
                "$text" => Self::matches_text(condition, document)?,
                _ if key.starts_with('$') => {
                    return Err(DataRepositoryError::Backend(format!(
                        "unsupported filter operator: {key}"
                    )));
                }
                field => Self::matches_field(field, condition, document)?,
            };

            if !clause_holds {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Applies an update expression in place, returning true when the document
    /// actually changed.
    ///
    /// Fields under `$set` (and plain top-level fields) replace the current
    /// values; no other update operator is supported.
    pub(crate) fn apply_update(
        update: &Document,
        document: &mut Document,
    ) -> DataRepositoryResult<bool> {
        let before = document.clone();

        for (key, value) in update {
            match key.as_str() {
                "$set" => {
                    let fields = value.as_document().ok_or_else(|| {
                        DataRepositoryError::Backend("$set expects a document".into())
                    })?;
                    for (field, new_value) in fields {
                        document.insert(field.clone(), new_value.clone());
                    }
                }
                _ if key.starts_with('$') => {
                    return Err(DataRepositoryError::Backend(format!(
                        "unsupported update operator: {key}"
                    )));
                }
                field => {
                    document.insert(field.to_string(), value.clone());
                }
            }
        }

        Ok(*document != before)
    }

    /// Orders two optional field values for sorting.
    ///
    /// Missing values sort before present ones; incomparable pairs are treated
    /// as equal.
    pub(crate) fn compare(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => match (a, b) {
                (Bson::String(a), Bson::String(b)) => a.cmp(b),
                (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
                (Bson::DateTime(a), Bson::DateTime(b)) => a.cmp(b),
                _ => match (Self::as_number(a), Self::as_number(b)) {
                    (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                },
            },
        }
    }

    fn matches_or(condition: &Bson, document: &Document) -> DataRepositoryResult<bool> {
        let alternatives = condition.as_array().ok_or_else(|| {
            DataRepositoryError::Backend("$or expects an array of documents".into())
        })?;

        for alternative in alternatives {
            let sub = alternative.as_document().ok_or_else(|| {
                DataRepositoryError::Backend("$or expects an array of documents".into())
            })?;
            if Self::matches(sub, document)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn matches_text(condition: &Bson, document: &Document) -> DataRepositoryResult<bool> {
        let needle = condition
            .as_document()
            .and_then(|c| c.get_str("$search").ok())
            .ok_or_else(|| {
                DataRepositoryError::Backend("$text expects { $search: <string> }".into())
            })?
            .to_lowercase();

        Ok(document.values().any(|value| {
            value
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        }))
    }

    fn matches_field(
        field: &str,
        condition: &Bson,
        document: &Document,
    ) -> DataRepositoryResult<bool> {
        let actual = document.get(field);

        // A document-shaped condition carrying $in is a membership test;
        // everything else is plain equality.
        if let Some(values) = condition
            .as_document()
            .and_then(|c| c.get_array("$in").ok())
        {
            return Ok(actual
                .is_some_and(|value| values.iter().any(|candidate| Self::equals(value, candidate))));
        }

        Ok(actual.is_some_and(|value| Self::equals(value, condition)))
    }

    /// Value equality with numeric types normalized, so an `i32` filter matches
    /// an `i64` or `f64` field.
    fn equals(left: &Bson, right: &Bson) -> bool {
        if let (Some(a), Some(b)) = (Self::as_number(left), Self::as_number(right)) {
            return a == b;
        }
        left == right
    }

    fn as_number(value: &Bson) -> Option<f64> {
        match value {
            Bson::Int32(n) => Some(*n as f64),
            Bson::Int64(n) => Some(*n as f64),
            Bson::Double(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ExpressionEvaluator::matches(&doc! {}, &doc! { "a": 1 }).unwrap());
    }

    #[test]
    fn plain_equality_and_numeric_normalization() {
        let document = doc! { "a": 1_i64, "b": "x" };

        assert!(ExpressionEvaluator::matches(&doc! { "a": 1_i32 }, &document).unwrap());
        assert!(ExpressionEvaluator::matches(&doc! { "b": "x" }, &document).unwrap());
        assert!(!ExpressionEvaluator::matches(&doc! { "b": "y" }, &document).unwrap());
        assert!(!ExpressionEvaluator::matches(&doc! { "missing": 1 }, &document).unwrap());
    }

    #[test]
    fn in_clause_matches_membership() {
        let document = doc! { "owner": "u2" };
        let filter = doc! { "owner": { "$in": ["u1", "u2"] } };

        assert!(ExpressionEvaluator::matches(&filter, &document).unwrap());
        assert!(
            !ExpressionEvaluator::matches(&doc! { "owner": { "$in": ["u3"] } }, &document).unwrap()
        );
    }

    #[test]
    fn or_clause_matches_any_alternative() {
        let filter = doc! { "$or": [{ "a": 1 }, { "b": 2 }] };

        assert!(ExpressionEvaluator::matches(&filter, &doc! { "b": 2 }).unwrap());
        assert!(!ExpressionEvaluator::matches(&filter, &doc! { "a": 2, "b": 3 }).unwrap());
    }

    #[test]
    fn text_search_scans_string_fields() {
        let document = doc! { "name": "Post one", "body": "Interesting Body" };
        let filter = doc! { "$text": { "$search": "interesting" } };

        assert!(ExpressionEvaluator::matches(&filter, &document).unwrap());
        assert!(
            !ExpressionEvaluator::matches(&doc! { "$text": { "$search": "absent" } }, &document)
                .unwrap()
        );
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let result = ExpressionEvaluator::matches(&doc! { "$nor": [] }, &doc! {});
        assert!(result.is_err());
    }

    #[test]
    fn set_update_replaces_fields() {
        let mut document = doc! { "a": 1, "b": 2 };
        let changed =
            ExpressionEvaluator::apply_update(&doc! { "$set": { "b": 3, "c": 4 } }, &mut document)
                .unwrap();

        assert!(changed);
        assert_eq!(document, doc! { "a": 1, "b": 3, "c": 4 });
    }

    #[test]
    fn identical_set_reports_unchanged() {
        let mut document = doc! { "a": 1 };
        let changed =
            ExpressionEvaluator::apply_update(&doc! { "$set": { "a": 1 } }, &mut document).unwrap();

        assert!(!changed);
    }

    #[test]
    fn sort_comparison_handles_missing_fields() {
        let one = doc! { "n": 1 };
        let two = doc! { "n": 2 };

        assert_eq!(
            ExpressionEvaluator::compare(one.get("n"), two.get("n")),
            Ordering::Less
        );
        assert_eq!(
            ExpressionEvaluator::compare(one.get("missing"), two.get("n")),
            Ordering::Less
        );
    }
}
