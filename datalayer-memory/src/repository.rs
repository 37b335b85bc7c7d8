//! In-memory implementation of the repository contract.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Document, ser::serialize_to_bson};
use mea::rwlock::RwLock;
use serde::{Serialize, de::DeserializeOwned};

use datalayer_core::{
    error::{DataRepositoryError, DataRepositoryResult},
    operators::Operators,
    repository::{
        BulkUpdateOne, DataRepository, FindOptions, IndexSpec, SortDirection, UpdateOptions,
    },
    result::{QueryResult, SingleResult},
};

use crate::{cursor::VecCursor, evaluator::ExpressionEvaluator, operators::MemoryOperators};

type StoreMap = HashMap<String, Vec<Document>>;

/// Data repository holding every collection in process memory.
///
/// Cloneable; clones share the same underlying data through an `Arc`-wrapped
/// async read-write lock. Documents keep their insertion order, which is the
/// order unsorted queries return them in.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataRepository {
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryDataRepository {
    /// Creates a new, empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn to_document<T: Serialize>(data: &T) -> DataRepositoryResult<Document> {
        serialize_to_bson(data)?
            .as_document()
            .cloned()
            .ok_or_else(|| {
                DataRepositoryError::InvalidDocument("expected a document-shaped value".into())
            })
    }

    /// Seed document for an upsert: the filter's plain equality fields with the
    /// update applied on top.
    fn upsert_document(filter: &Document, update: &Document) -> DataRepositoryResult<Document> {
        let mut document = Document::new();
        for (key, value) in filter {
            if key.starts_with('$') || value.as_document().is_some_and(|c| c.contains_key("$in")) {
                continue;
            }
            document.insert(key.clone(), value.clone());
        }
        ExpressionEvaluator::apply_update(update, &mut document)?;

        Ok(document)
    }

    fn matching_documents(
        documents: &[Document],
        filter: &Document,
        options: &FindOptions,
    ) -> DataRepositoryResult<Vec<Document>> {
        let mut matched = Vec::new();
        for document in documents {
            if ExpressionEvaluator::matches(filter, document)? {
                matched.push(document.clone());
            }
        }

        if !options.sort.is_empty() {
            matched.sort_by(|a, b| {
                for key in &options.sort {
                    let ordering = ExpressionEvaluator::compare(a.get(&key.field), b.get(&key.field));
                    let ordering = match key.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    };
                    if !ordering.is_eq() {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let limit = options
            .limit
            .filter(|l| *l > 0)
            .map_or(usize::MAX, |l| l as usize);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn update_matching(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: UpdateOptions,
        just_one: bool,
    ) -> DataRepositoryResult<u64> {
        let mut store = self.store.write().await;
        let documents = store.entry(collection.to_string()).or_default();

        let mut matched = false;
        let mut modified = 0;
        for document in documents.iter_mut() {
            if !ExpressionEvaluator::matches(filter, document)? {
                continue;
            }
            matched = true;
            if ExpressionEvaluator::apply_update(update, document)? {
                modified += 1;
            }
            if just_one {
                break;
            }
        }

        if !matched && options.upsert {
            documents.push(Self::upsert_document(filter, update)?);
            modified += 1;
        }

        Ok(modified)
    }
}

#[async_trait]
impl DataRepository for MemoryDataRepository {
    type Operators = MemoryOperators;

    async fn create_index(
        &self,
        collection: &str,
        indexes: Vec<IndexSpec>,
    ) -> DataRepositoryResult<()> {
        // No indexing in memory; accept the request so migrations run unchanged.
        log::debug!(
            "create_index (noop): collection={collection}, indexes={}",
            indexes.len()
        );

        Ok(())
    }

    async fn save<T>(&self, collection: &str, data: &T) -> DataRepositoryResult<u64>
    where
        T: Serialize + Send + Sync,
    {
        let document = Self::to_document(data)?;
        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(1)
    }

    async fn save_many<T>(&self, collection: &str, data: &[T]) -> DataRepositoryResult<u64>
    where
        T: Serialize + Send + Sync,
    {
        let documents = data
            .iter()
            .map(Self::to_document)
            .collect::<DataRepositoryResult<Vec<Document>>>()?;
        let count = documents.len() as u64;

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(documents);

        Ok(count)
    }

    async fn find<T>(
        &self,
        collection: &str,
        filter: &Self::Operators,
        options: FindOptions,
    ) -> QueryResult<T>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let store = self.store.read().await;
        let documents = store.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        match Self::matching_documents(documents, &filter.get_operation(), &options) {
            Ok(matched) => QueryResult::new(Box::new(VecCursor::new(matched))),
            Err(err) => QueryResult::with_error(err),
        }
    }

    async fn find_one<T>(&self, collection: &str, filter: &Self::Operators) -> SingleResult<T>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let store = self.store.read().await;
        let documents = store.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        let expression = filter.get_operation();

        for document in documents {
            match ExpressionEvaluator::matches(&expression, document) {
                Ok(true) => {
                    return match bson::de::deserialize_from_bson(bson::Bson::Document(
                        document.clone(),
                    )) {
                        Ok(decoded) => SingleResult::new(Some(decoded)),
                        Err(e) => SingleResult::with_error(DataRepositoryError::Serialization(
                            e.to_string(),
                        )),
                    };
                }
                Ok(false) => {}
                Err(err) => return SingleResult::with_error(err),
            }
        }

        SingleResult::new(None)
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Self::Operators,
        data: &Self::Operators,
        options: UpdateOptions,
    ) -> DataRepositoryResult<u64> {
        self.update_matching(
            collection,
            &filter.get_operation(),
            &data.get_operation(),
            options,
            true,
        )
        .await
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Self::Operators,
        data: &Self::Operators,
        options: UpdateOptions,
    ) -> DataRepositoryResult<u64> {
        self.update_matching(
            collection,
            &filter.get_operation(),
            &data.get_operation(),
            options,
            false,
        )
        .await
    }

    async fn bulk_update_one(
        &self,
        collection: &str,
        operations: Vec<BulkUpdateOne<Self::Operators>>,
    ) -> DataRepositoryResult<u64> {
        let mut modified = 0;
        for operation in operations {
            modified += self
                .update_matching(
                    collection,
                    &operation.filter.get_operation(),
                    &operation.data.get_operation(),
                    UpdateOptions { upsert: operation.upsert },
                    true,
                )
                .await?;
        }

        Ok(modified)
    }

    async fn delete(
        &self,
        collection: &str,
        filter: &Self::Operators,
        just_one: bool,
    ) -> DataRepositoryResult<u64> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(0);
        };
        let expression = filter.get_operation();

        let mut failure = None;
        let mut deleted = 0;
        documents.retain(|document| {
            if failure.is_some() || (just_one && deleted > 0) {
                return true;
            }
            match ExpressionEvaluator::matches(&expression, document) {
                Ok(true) => {
                    deleted += 1;
                    false
                }
                Ok(false) => true,
                Err(err) => {
                    failure = Some(err);
                    true
                }
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(deleted),
        }
    }
}
