//! Raw cursor over a MongoDB driver cursor.

use async_trait::async_trait;
use bson::{Bson, Document};
use mongodb::Cursor;

use datalayer_core::{
    cursor::RawCursor,
    error::{DataRepositoryError, DataRepositoryResult},
};

/// Wraps a driver cursor behind the [`RawCursor`] capability.
///
/// The driver couples advancing and reading (`advance` then
/// `deserialize_current`), while the capability separates availability from
/// fetching; the document read on a successful advance is parked in `pending`
/// until the next fetch. Dropping the driver cursor releases its server-side
/// resources, so `close` simply discards it.
pub struct MongoCursor {
    cursor: Option<Cursor<Document>>,
    pending: Option<Document>,
}

impl MongoCursor {
    pub fn new(cursor: Cursor<Document>) -> Self {
        Self { cursor: Some(cursor), pending: None }
    }
}

#[async_trait]
impl RawCursor for MongoCursor {
    async fn has_next(&mut self) -> DataRepositoryResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(false);
        };

        if cursor
            .advance()
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?
        {
            self.pending = Some(
                cursor
                    .deserialize_current()
                    .map_err(|e| DataRepositoryError::Serialization(e.to_string()))?,
            );
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn fetch_next(&mut self) -> DataRepositoryResult<Option<Bson>> {
        Ok(self.pending.take().map(Bson::Document))
    }

    async fn close(&mut self) -> DataRepositoryResult<()> {
        self.cursor = None;
        self.pending = None;

        Ok(())
    }
}
