//! Raw cursor over an in-memory result buffer.

use std::collections::VecDeque;

use async_trait::async_trait;
use bson::{Bson, Document};

use datalayer_core::{cursor::RawCursor, error::DataRepositoryResult};

/// A [`RawCursor`] draining a buffer of matched documents.
///
/// The buffer is the cursor's only resource; `close` drops whatever was not
/// consumed.
pub struct VecCursor {
    documents: VecDeque<Document>,
}

impl VecCursor {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents: documents.into() }
    }
}

#[async_trait]
impl RawCursor for VecCursor {
    async fn has_next(&mut self) -> DataRepositoryResult<bool> {
        Ok(!self.documents.is_empty())
    }

    async fn fetch_next(&mut self) -> DataRepositoryResult<Option<Bson>> {
        Ok(self.documents.pop_front().map(Bson::Document))
    }

    async fn close(&mut self) -> DataRepositoryResult<()> {
        self.documents.clear();

        Ok(())
    }
}
