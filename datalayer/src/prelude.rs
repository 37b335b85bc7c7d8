//! Convenient re-exports of commonly used types from datalayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use datalayer::prelude::*;
//! ```

pub use datalayer_core::{
    cursor::RawCursor,
    error::{DataRepositoryError, DataRepositoryResult},
    operators::Operators,
    repository::{
        BulkUpdateOne, DataRepository, FindOptions, IndexSpec, Sort, SortDirection, UpdateOptions,
    },
    result::{QueryResult, SingleResult},
};
