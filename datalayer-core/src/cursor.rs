//! The raw-cursor capability a store adapter supplies to the result abstraction.
//!
//! A raw cursor is a forward-only, resource-backed handle over a multi-document
//! query result. [`QueryResult`](crate::result::QueryResult) owns exactly one raw
//! cursor and drives it through this interface; it never touches the driver
//! directly. One outstanding call at a time per cursor; `has_next`, `fetch_next`
//! and `close` are suspension points.

use async_trait::async_trait;
use bson::Bson;

use crate::error::DataRepositoryResult;

/// Adapter-supplied cursor over a driver query result.
///
/// Implementations wrap whatever the driver hands back (a network cursor, an
/// in-memory buffer) and expose the minimal advance/fetch/release surface the
/// result abstraction needs. Documents cross the boundary as [`Bson`] values;
/// typed decoding happens in the result abstraction.
#[async_trait]
pub trait RawCursor: Send {
    /// Reports whether another document is available, suspending until the
    /// underlying source answers.
    async fn has_next(&mut self) -> DataRepositoryResult<bool>;

    /// Advances to and fetches the next document.
    ///
    /// Returns `Ok(None)` once the sequence is exhausted. Callers are expected to
    /// check [`has_next`](RawCursor::has_next) first; an implementation may rely
    /// on that ordering.
    async fn fetch_next(&mut self) -> DataRepositoryResult<Option<Bson>>;

    /// Releases the underlying resource.
    ///
    /// Must be safe to call on a cursor that was never advanced or is already
    /// exhausted.
    async fn close(&mut self) -> DataRepositoryResult<()>;
}
