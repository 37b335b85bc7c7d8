//! The operator-builder capability interface.
//!
//! An operator builder accumulates a filter or update specification through a chain
//! of semantically-named calls and emits it in the target store's native shape on
//! demand. Accumulation is monotonic: later calls never remove earlier clauses, they
//! only overwrite the clause under the same top-level key. Only [`clear`](Operators::clear)
//! resets the expression.
//!
//! Every store adapter provides its own emitter behind this contract, so the same
//! call sites work against any backend.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//!
//! let filter = repo.operators()
//!     .plain(doc! { "is_test": true })
//!     .search("foo");
//!
//! assert_eq!(
//!     filter.get_operation(),
//!     doc! { "is_test": true, "$text": { "$search": "foo" } },
//! );
//! ```

use bson::Bson;

/// Capability interface for accumulating query/update expressions.
///
/// Every operation consumes the builder and returns it with the new clause merged
/// in, so calls can be chained fluently. Operations are pure data accumulation and
/// cannot fail; all error generation happens when the expression is executed by a
/// repository.
///
/// A fresh, empty builder is obtained from
/// [`DataRepository::operators`](crate::repository::DataRepository::operators) and
/// is owned solely by its caller. Builders are not synchronized for concurrent
/// mutation.
pub trait Operators: Default + Send + Sync {
    /// The native-shaped expression value this builder emits.
    type Operation: Clone + Send + Sync;

    /// Shallow-merges plain fields directly into the expression.
    ///
    /// Fields are not namespaced under any operator keyword; the last write wins
    /// per field key.
    fn plain(self, fields: Self::Operation) -> Self;

    /// Merges a replace-value clause for the given fields.
    ///
    /// The whole clause is replaced by the most recent call: composing two `set`
    /// calls does not union their field sets. Callers needing multiple field
    /// updates must pass them in one call.
    fn set(self, fields: Self::Operation) -> Self;

    /// Merges a "value is one of" clause for the given field.
    ///
    /// The last call for the same field overwrites any prior membership clause for
    /// that field. Named `is_in` because `in` is a Rust keyword.
    fn is_in(self, field: impl Into<String>, values: Vec<Bson>) -> Self;

    /// Merges a full-text search clause, replacing any prior search clause.
    fn search(self, text: impl Into<String>) -> Self;

    /// Merges a logical-OR clause over the given sub-expressions, replacing any
    /// prior OR clause.
    ///
    /// Sub-expressions are native-shaped values produced by the same builder
    /// family (via [`get_operation`](Operators::get_operation)); they are not
    /// further validated.
    fn or(self, expressions: Vec<Self::Operation>) -> Self;

    /// Resets the expression to empty, discarding all accumulated clauses.
    ///
    /// Calling `clear` on an already-empty builder is a no-op.
    fn clear(self) -> Self;

    /// Returns the current accumulated expression in native shape.
    ///
    /// Read-only; safe to call repeatedly without mutating the builder.
    fn get_operation(&self) -> Self::Operation;
}
