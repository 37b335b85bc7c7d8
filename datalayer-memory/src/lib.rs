//! In-memory adapter for the datalayer repository abstraction.
//!
//! Backs the full repository contract with `HashMap`-held collections behind an
//! async-aware read-write lock. Queries interpret the same native-shaped
//! expressions the operator builder emits (plain equality, `$in`, `$or`,
//! `$text`/`$search`, `$set`), so call sites written against a persistent backend
//! run unchanged in development and tests.
//!
//! Queries scan the whole collection; there is no indexing. That is acceptable
//! for the intended use as a development and test double.
//!
//! # Quick Start
//!
//! ```ignore
//! use datalayer_memory::MemoryDataRepository;
//! use datalayer_core::{operators::Operators, repository::DataRepository};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let repo = MemoryDataRepository::new();
//!     repo.save("posts", &doc! { "name": "hello", "is_test": true }).await.unwrap();
//!
//!     let filter = repo.operators().plain(doc! { "is_test": true });
//!     let found = repo.find_one::<bson::Document>("posts", &filter).await;
//!     assert!(!found.no_result());
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as datalayer_memory;

pub mod cursor;
pub mod evaluator;
pub mod operators;
pub mod repository;

pub use operators::MemoryOperators;
pub use repository::MemoryDataRepository;
