//! Result abstractions unifying single-document and cursor-based reads.
//!
//! Both abstractions follow the same contract: underlying failures are never
//! thrown, they are recorded on the result and retrieved via `error()`. Callers
//! check `error()` before trusting anything `decode()` returns.
//!
//! [`SingleResult`] is immutable after construction. [`QueryResult`] is a
//! single-pass, forward-only iterator over a driver-bounded sequence; it holds an
//! external resource and must be released with [`close`](QueryResult::close)
//! exactly once after use, regardless of how iteration ended.

use bson::de::deserialize_from_bson;
use serde::de::DeserializeOwned;

use crate::{
    cursor::RawCursor,
    error::{DataRepositoryError, DataRepositoryResult},
};

/// Wraps at most one retrieved document plus an optional error.
///
/// Exactly one of three terminal states holds for any instance: an error was
/// recorded, a document was found, or the query matched nothing
/// ([`no_result`](SingleResult::no_result) is true). No-match is a legitimate
/// outcome, distinct from an error.
#[derive(Debug)]
pub struct SingleResult<T> {
    result: Option<T>,
    err: Option<DataRepositoryError>,
}

impl<T> SingleResult<T> {
    /// Creates a successful result, with or without a matching document.
    pub fn new(result: Option<T>) -> Self {
        Self { result, err: None }
    }

    /// Creates a result carrying the failure of the underlying operation.
    pub fn with_error(err: DataRepositoryError) -> Self {
        Self { result: None, err: Some(err) }
    }

    /// Returns the wrapped document, if one was found.
    pub fn decode(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// True iff no error was recorded and no document was found.
    ///
    /// An error is not "no result"; it is a distinct failure state.
    pub fn no_result(&self) -> bool {
        self.err.is_none() && self.result.is_none()
    }

    /// Returns the recorded error, or `None` if the operation succeeded.
    pub fn error(&self) -> Option<&DataRepositoryError> {
        self.err.as_ref()
    }

    /// Consumes the result, yielding the document for `?`-style propagation.
    pub fn into_inner(self) -> DataRepositoryResult<Option<T>> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}

/// Wraps a lazily-iterated sequence of documents behind a raw driver cursor.
///
/// The cursor moves through four states: constructed with an error (terminal,
/// [`next`](QueryResult::next) is always false), active, exhausted (`next`
/// returned false; sticky), and closed. `close` must be called exactly once per
/// cursor after use; failing to call it leaks the connection-held resource.
/// Calling `next` after `close` returns false without side effects.
pub struct QueryResult<T> {
    cursor: Option<Box<dyn RawCursor>>,
    current: Option<T>,
    err: Option<DataRepositoryError>,
    exhausted: bool,
}

impl<T> std::fmt::Debug for QueryResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult")
            .field("open", &self.cursor.is_some())
            .field("exhausted", &self.exhausted)
            .field("err", &self.err)
            .finish()
    }
}

impl<T: DeserializeOwned + Send> QueryResult<T> {
    /// Creates an active result over the given raw cursor.
    pub fn new(cursor: Box<dyn RawCursor>) -> Self {
        Self {
            cursor: Some(cursor),
            current: None,
            err: None,
            exhausted: false,
        }
    }

    /// Creates a result carrying a construction-time failure.
    ///
    /// `next` on such a result always returns false without attempting a fetch.
    pub fn with_error(err: DataRepositoryError) -> Self {
        Self {
            cursor: None,
            current: None,
            err: Some(err),
            exhausted: false,
        }
    }

    /// Advances to the next document, suspending on the underlying source.
    ///
    /// Returns true only when a non-empty document was fetched and decoded; the
    /// document is then available through [`decode`](QueryResult::decode).
    /// Returns false when the result was constructed with an error, the cursor is
    /// exhausted or closed, or a fetch/decode failure was recorded (retrievable
    /// via [`error`](QueryResult::error)). Once false, every subsequent call is
    /// false.
    pub async fn next(&mut self) -> bool {
        if self.err.is_some() || self.exhausted {
            return false;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };

        match cursor.has_next().await {
            Ok(true) => {}
            Ok(false) => {
                self.exhausted = true;
                self.current = None;
                return false;
            }
            Err(err) => {
                self.err = Some(err);
                return false;
            }
        }

        match cursor.fetch_next().await {
            Ok(Some(raw)) => match deserialize_from_bson::<T>(raw) {
                Ok(doc) => {
                    self.current = Some(doc);
                    true
                }
                Err(err) => {
                    self.err = Some(err.into());
                    false
                }
            },
            Ok(None) => {
                self.exhausted = true;
                self.current = None;
                false
            }
            Err(err) => {
                self.err = Some(err);
                false
            }
        }
    }

    /// Returns the current document.
    ///
    /// `None` before the first advance and after exhaustion.
    pub fn decode(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Releases the underlying resource.
    ///
    /// Safe to invoke on a cursor that was never advanced or is already
    /// exhausted; calls after the first are no-ops. A release failure is
    /// forwarded to the caller.
    pub async fn close(&mut self) -> DataRepositoryResult<()> {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close().await?;
        }

        Ok(())
    }

    /// Returns any error recorded at construction time or during iteration.
    pub fn error(&self) -> Option<&DataRepositoryError> {
        self.err.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bson::{Bson, Document, doc};
    use std::collections::VecDeque;

    struct StubCursor {
        docs: VecDeque<Bson>,
        has_next_calls: usize,
        fetch_calls: usize,
        close_calls: usize,
    }

    impl StubCursor {
        fn over(docs: Vec<Document>) -> Self {
            Self {
                docs: docs.into_iter().map(Bson::Document).collect(),
                has_next_calls: 0,
                fetch_calls: 0,
                close_calls: 0,
            }
        }
    }

    #[async_trait]
    impl RawCursor for StubCursor {
        async fn has_next(&mut self) -> DataRepositoryResult<bool> {
            self.has_next_calls += 1;
            Ok(!self.docs.is_empty())
        }

        async fn fetch_next(&mut self) -> DataRepositoryResult<Option<Bson>> {
            self.fetch_calls += 1;
            Ok(self.docs.pop_front())
        }

        async fn close(&mut self) -> DataRepositoryResult<()> {
            self.close_calls += 1;
            Ok(())
        }
    }

    struct FailingCursor;

    #[async_trait]
    impl RawCursor for FailingCursor {
        async fn has_next(&mut self) -> DataRepositoryResult<bool> {
            Err(DataRepositoryError::Backend("connection reset".into()))
        }

        async fn fetch_next(&mut self) -> DataRepositoryResult<Option<Bson>> {
            Err(DataRepositoryError::Backend("connection reset".into()))
        }

        async fn close(&mut self) -> DataRepositoryResult<()> {
            Ok(())
        }
    }

    #[test]
    fn single_result_exclusivity() {
        let found: SingleResult<Document> = SingleResult::new(Some(doc! { "name": "a" }));
        assert!(found.error().is_none());
        assert!(!found.no_result());
        assert!(found.decode().is_some());

        let missing: SingleResult<Document> = SingleResult::new(None);
        assert!(missing.error().is_none());
        assert!(missing.no_result());
        assert!(missing.decode().is_none());

        let failed: SingleResult<Document> =
            SingleResult::with_error(DataRepositoryError::Backend("down".into()));
        assert!(failed.error().is_some());
        assert!(!failed.no_result());
        assert!(failed.decode().is_none());
    }

    #[test]
    fn single_result_into_inner() {
        let found: SingleResult<Document> = SingleResult::new(Some(doc! { "n": 1 }));
        assert_eq!(found.into_inner().unwrap(), Some(doc! { "n": 1 }));

        let failed: SingleResult<Document> =
            SingleResult::with_error(DataRepositoryError::Backend("down".into()));
        assert!(failed.into_inner().is_err());
    }

    #[tokio::test]
    async fn cursor_iterates_and_exhaustion_is_sticky() {
        let cursor = StubCursor::over(vec![doc! { "n": 1 }, doc! { "n": 2 }]);
        let mut result: QueryResult<Document> = QueryResult::new(Box::new(cursor));

        assert!(result.decode().is_none());
        assert!(result.next().await);
        assert_eq!(result.decode().unwrap().get_i32("n").unwrap(), 1);
        assert!(result.next().await);
        assert_eq!(result.decode().unwrap().get_i32("n").unwrap(), 2);

        assert!(!result.next().await);
        assert!(!result.next().await);
        assert!(result.decode().is_none());
        assert!(result.error().is_none());

        result.close().await.unwrap();
    }

    #[tokio::test]
    async fn error_construction_short_circuits() {
        let mut result: QueryResult<Document> =
            QueryResult::with_error(DataRepositoryError::Backend("query failed".into()));

        assert!(!result.next().await);
        assert!(result.error().is_some());
        assert!(result.decode().is_none());

        // Closing an error-constructed result is harmless.
        result.close().await.unwrap();
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded_not_thrown() {
        let mut result: QueryResult<Document> = QueryResult::new(Box::new(FailingCursor));

        assert!(!result.next().await);
        assert!(matches!(result.error(), Some(DataRepositoryError::Backend(_))));
        assert!(!result.next().await);

        result.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_set_returns_false_immediately() {
        let cursor = StubCursor::over(vec![]);
        let mut result: QueryResult<Document> = QueryResult::new(Box::new(cursor));

        assert!(!result.next().await);
        assert!(result.decode().is_none());
        assert!(result.error().is_none());

        result.close().await.unwrap();
    }

    #[tokio::test]
    async fn close_is_safe_and_idempotent() {
        let cursor = StubCursor::over(vec![doc! { "n": 1 }]);
        let mut result: QueryResult<Document> = QueryResult::new(Box::new(cursor));

        // Close without ever advancing.
        result.close().await.unwrap();
        // Second close is a no-op.
        result.close().await.unwrap();
        // next() after close is defined as false.
        assert!(!result.next().await);
    }

    #[tokio::test]
    async fn close_preserves_decoded_state() {
        let cursor = StubCursor::over(vec![doc! { "n": 7 }]);
        let mut result: QueryResult<Document> = QueryResult::new(Box::new(cursor));

        assert!(result.next().await);
        result.close().await.unwrap();
        assert_eq!(result.decode().unwrap().get_i32("n").unwrap(), 7);
    }
}
