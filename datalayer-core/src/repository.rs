//! The data repository contract: CRUD and query operations over named collections.
//!
//! Repository methods are thin pass-throughs: they forward an already-built
//! operator expression to the underlying store and wrap the outcome in the result
//! abstractions. They carry no query logic of their own.

use async_trait::async_trait;
use bson::Document;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::DataRepositoryResult,
    operators::Operators,
    result::{QueryResult, SingleResult},
};

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Sort specification: the field to sort by and the direction.
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}

/// Options for multi-document reads.
///
/// Unset values are omitted from the native query; a `limit` or `skip` of zero is
/// treated the same as unset.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Maximum number of documents returned.
    pub limit: Option<u64>,
    /// Number of documents to skip ahead (useful for pagination).
    pub skip: Option<u64>,
    /// Sort keys applied in order.
    pub sort: Vec<Sort>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort.push(sort);
        self
    }
}

/// Options for update operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Insert the document when no document matches the filter.
    pub upsert: bool,
}

impl UpdateOptions {
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// A named index over one or more document fields.
///
/// `keys` is a native-shaped key specification, e.g. `doc! { "field1": 1 }` for a
/// single ascending key or `doc! { "body": "text" }` for a text index.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub name: String,
    pub keys: Document,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, keys: Document) -> Self {
        Self { name: name.into(), keys }
    }
}

/// One entry of a bulk update-one operation: a filter, the update to apply to the
/// first matching document, and whether to upsert.
#[derive(Debug)]
pub struct BulkUpdateOne<O: Operators> {
    pub filter: O,
    pub data: O,
    pub upsert: bool,
}

/// Storage-agnostic repository over document collections.
///
/// Implementations delegate to a concrete store. Callers never see the store's
/// native query syntax: filters and updates are built through the
/// [`Operators`] capability obtained from [`operators`](DataRepository::operators),
/// and reads come back through the result abstractions.
///
/// Write operations return affected-document counts; all failures surface as
/// [`DataRepositoryError`](crate::error::DataRepositoryError) values, either in
/// the returned `Result` or recorded on the result abstraction.
#[async_trait]
pub trait DataRepository: Send + Sync {
    /// The operator builder this repository's store understands.
    type Operators: Operators;

    /// Returns a fresh, empty operator builder.
    ///
    /// A new builder is created on every call; builders are never shared or
    /// reused behind the caller's back.
    fn operators(&self) -> Self::Operators {
        Self::Operators::default()
    }

    /// Creates the given indexes on a collection.
    async fn create_index(
        &self,
        collection: &str,
        indexes: Vec<IndexSpec>,
    ) -> DataRepositoryResult<()>;

    /// Inserts a single document, returning the inserted count.
    async fn save<T>(&self, collection: &str, data: &T) -> DataRepositoryResult<u64>
    where
        T: Serialize + Send + Sync;

    /// Inserts a batch of documents (unordered), returning the inserted count.
    async fn save_many<T>(&self, collection: &str, data: &[T]) -> DataRepositoryResult<u64>
    where
        T: Serialize + Send + Sync;

    /// Opens a cursor over all documents matching the filter.
    ///
    /// A query that fails to start yields a [`QueryResult`] carrying the
    /// construction-time error rather than returning `Err`; the caller detects it
    /// through [`QueryResult::error`].
    async fn find<T>(
        &self,
        collection: &str,
        filter: &Self::Operators,
        options: FindOptions,
    ) -> QueryResult<T>
    where
        T: DeserializeOwned + Send + Sync;

    /// Fetches the first document matching the filter.
    async fn find_one<T>(&self, collection: &str, filter: &Self::Operators) -> SingleResult<T>
    where
        T: DeserializeOwned + Send + Sync;

    /// Updates the first document matching the filter, returning the modified
    /// (plus upserted) count.
    async fn update(
        &self,
        collection: &str,
        filter: &Self::Operators,
        data: &Self::Operators,
        options: UpdateOptions,
    ) -> DataRepositoryResult<u64>;

    /// Updates every document matching the filter, returning the modified count.
    async fn update_many(
        &self,
        collection: &str,
        filter: &Self::Operators,
        data: &Self::Operators,
        options: UpdateOptions,
    ) -> DataRepositoryResult<u64>;

    /// Applies a batch of update-one operations (unordered), returning the total
    /// modified (plus upserted) count.
    async fn bulk_update_one(
        &self,
        collection: &str,
        operations: Vec<BulkUpdateOne<Self::Operators>>,
    ) -> DataRepositoryResult<u64>;

    /// Deletes matching documents, returning the deleted count.
    ///
    /// With `just_one` set, only the first matching document is removed.
    async fn delete(
        &self,
        collection: &str,
        filter: &Self::Operators,
        just_one: bool,
    ) -> DataRepositoryResult<u64>;
}
