//! Main datalayer crate providing a unified interface for document persistence.
//!
//! This crate is the primary entry point for users of the datalayer framework. It
//! re-exports the storage-agnostic contracts from `datalayer-core` and provides
//! convenient access to the concrete store adapters.
//!
//! # Features
//!
//! - **Store-agnostic call sites** - Filters and updates are built through a small
//!   operator capability; the backing store can be swapped without touching them
//! - **Uniform read results** - Single-document and cursor-based reads share one
//!   decode/error/end-of-data contract
//! - **Multiple backends** - In-memory for development and tests, MongoDB for
//!   persistence (behind the `mongodb` feature)
//!
//! # Quick Start
//!
//! ```ignore
//! use datalayer::{prelude::*, memory::MemoryDataRepository};
//! use bson::doc;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Post {
//!     pub name: String,
//!     pub is_test: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = MemoryDataRepository::new();
//!
//!     repo.save("posts", &Post { name: "hello".into(), is_test: true }).await?;
//!
//!     // Build the filter through the operator capability; the expression shape
//!     // stays an implementation detail of the adapter.
//!     let filter = repo.operators().plain(doc! { "is_test": true });
//!
//!     let mut posts = repo.find::<Post>("posts", &filter, FindOptions::new()).await;
//!     while posts.next().await {
//!         if let Some(post) = posts.decode() {
//!             println!("{}", post.name);
//!         }
//!     }
//!     posts.close().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Result contract
//!
//! Repository reads never throw through the result values: a failed query is
//! recorded on the returned result and retrieved with `error()`. Check it before
//! trusting `decode()`. A query that matched nothing is not an error: `no_result()`
//! is true on a single result, and `next()` returns false on the first advance of
//! a cursor. Cursors hold a connection-owned resource and must be released with
//! `close()` exactly once after use, however iteration ended.
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use datalayer_core::{cursor, error, operators, repository, result};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage adapter.
pub mod memory {
    pub use datalayer_memory::{MemoryDataRepository, MemoryOperators};
}

/// MongoDB storage adapter.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use datalayer_mongodb::{MongoClient, MongoConfig, MongoDataRepository, MongoOperators};
}
