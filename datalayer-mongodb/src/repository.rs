//! MongoDB-backed implementation of the repository contract.
//!
//! Every operation is a thin delegation to the driver: the already-built operator
//! expression is emitted with `get_operation()` and handed to the corresponding
//! collection call, and the outcome is wrapped in the core result abstractions.

use async_trait::async_trait;
use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use futures::{StreamExt, TryStreamExt, stream::iter};
use mongodb::{
    IndexModel,
    options::{FindOptions as DriverFindOptions, IndexOptions},
};
use serde::{Serialize, de::DeserializeOwned};

use datalayer_core::{
    error::{DataRepositoryError, DataRepositoryResult},
    operators::Operators,
    repository::{
        BulkUpdateOne, DataRepository, FindOptions, IndexSpec, SortDirection, UpdateOptions,
    },
    result::{QueryResult, SingleResult},
};

use crate::{client::MongoClient, cursor::MongoCursor, operators::MongoOperators};

/// Data repository backed by MongoDB.
#[derive(Debug)]
pub struct MongoDataRepository {
    client: MongoClient,
}

impl MongoDataRepository {
    /// Creates a new repository over an established client.
    pub fn new(client: MongoClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    /// Consumes the repository and closes the underlying client.
    pub async fn close(self) -> DataRepositoryResult<()> {
        self.client.close().await
    }

    fn to_document<T: Serialize>(data: &T) -> DataRepositoryResult<Document> {
        serialize_to_bson(data)?
            .as_document()
            .cloned()
            .ok_or_else(|| {
                DataRepositoryError::InvalidDocument("expected a document-shaped value".into())
            })
    }

    fn driver_options(options: &FindOptions) -> DriverFindOptions {
        let mut driver = DriverFindOptions::default();

        if let Some(limit) = options.limit.filter(|l| *l > 0) {
            driver.limit = Some(limit as i64);
        }
        if let Some(skip) = options.skip.filter(|s| *s > 0) {
            driver.skip = Some(skip);
        }
        if !options.sort.is_empty() {
            let mut sort = Document::new();
            for key in &options.sort {
                sort.insert(
                    key.field.clone(),
                    match key.direction {
                        SortDirection::Asc => 1,
                        SortDirection::Desc => -1,
                    },
                );
            }
            driver.sort = Some(sort);
        }

        driver
    }
}

#[async_trait]
impl DataRepository for MongoDataRepository {
    type Operators = MongoOperators;

    async fn create_index(
        &self,
        collection: &str,
        indexes: Vec<IndexSpec>,
    ) -> DataRepositoryResult<()> {
        let models = indexes
            .into_iter()
            .map(|index| {
                IndexModel::builder()
                    .keys(index.keys)
                    .options(
                        IndexOptions::builder()
                            .name(index.name)
                            .build(),
                    )
                    .build()
            })
            .collect::<Vec<_>>();

        self.client
            .collection(collection)
            .create_indexes(models)
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn save<T>(&self, collection: &str, data: &T) -> DataRepositoryResult<u64>
    where
        T: Serialize + Send + Sync,
    {
        self.client
            .collection(collection)
            .insert_one(Self::to_document(data)?)
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

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

        let result = self
            .client
            .collection(collection)
            .insert_many(documents)
            .ordered(false)
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

        Ok(result.inserted_ids.len() as u64)
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
        log::debug!("find: collection={collection}");

        match self
            .client
            .collection(collection)
            .find(filter.get_operation())
            .with_options(Self::driver_options(&options))
            .await
        {
            Ok(cursor) => QueryResult::new(Box::new(MongoCursor::new(cursor))),
            Err(e) => QueryResult::with_error(DataRepositoryError::Backend(e.to_string())),
        }
    }

    async fn find_one<T>(&self, collection: &str, filter: &Self::Operators) -> SingleResult<T>
    where
        T: DeserializeOwned + Send + Sync,
    {
        log::debug!("find_one: collection={collection}");

        match self
            .client
            .collection(collection)
            .find_one(filter.get_operation())
            .await
        {
            Ok(Some(document)) => match deserialize_from_bson::<T>(Bson::Document(document)) {
                Ok(decoded) => SingleResult::new(Some(decoded)),
                Err(e) => {
                    SingleResult::with_error(DataRepositoryError::Serialization(e.to_string()))
                }
            },
            Ok(None) => SingleResult::new(None),
            Err(e) => SingleResult::with_error(DataRepositoryError::Backend(e.to_string())),
        }
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Self::Operators,
        data: &Self::Operators,
        options: UpdateOptions,
    ) -> DataRepositoryResult<u64> {
        let result = self
            .client
            .collection(collection)
            .update_one(filter.get_operation(), data.get_operation())
            .upsert(options.upsert)
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

        Ok(result.modified_count + result.upserted_id.map_or(0, |_| 1))
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Self::Operators,
        data: &Self::Operators,
        options: UpdateOptions,
    ) -> DataRepositoryResult<u64> {
        let result = self
            .client
            .collection(collection)
            .update_many(filter.get_operation(), data.get_operation())
            .upsert(options.upsert)
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

        Ok(result.modified_count + result.upserted_id.map_or(0, |_| 1))
    }

    async fn bulk_update_one(
        &self,
        collection: &str,
        operations: Vec<BulkUpdateOne<Self::Operators>>,
    ) -> DataRepositoryResult<u64> {
        let target = self.client.collection(collection);

        let results = iter(operations)
            .then(async |operation| {
                target
                    .update_one(
                        operation.filter.get_operation(),
                        operation.data.get_operation(),
                    )
                    .upsert(operation.upsert)
                    .await
                    .map_err(|e| DataRepositoryError::Backend(e.to_string()))
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(results
            .into_iter()
            .map(|r| r.modified_count + r.upserted_id.map_or(0, |_| 1))
            .sum())
    }

    async fn delete(
        &self,
        collection: &str,
        filter: &Self::Operators,
        just_one: bool,
    ) -> DataRepositoryResult<u64> {
        log::debug!("delete: collection={collection}, just_one={just_one}");

        let target = self.client.collection(collection);
        let result = if just_one {
            target
                .delete_one(filter.get_operation())
                .await
        } else {
            target
                .delete_many(filter.get_operation())
                .await
        }
        .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

        Ok(result.deleted_count)
    }
}
