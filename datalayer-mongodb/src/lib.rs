//! MongoDB adapter for the datalayer repository abstraction.
//!
//! This crate backs the storage-agnostic contracts from `datalayer-core` with the
//! official MongoDB driver:
//!
//! - [`MongoOperators`] emits filter/update expressions as native `bson::Document`s
//! - [`MongoDataRepository`] delegates the repository operations to driver calls
//! - [`MongoClient`] owns the connection and hands out collections
//!
//! # Example
//!
//! ```ignore
//! use datalayer_mongodb::{MongoClient, MongoConfig, MongoDataRepository};
//! use datalayer_core::operators::Operators;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MongoClient::connect(MongoConfig::new(
//!         "mongodb://localhost:27017",
//!         "my_database",
//!     ))
//!     .await?;
//!     let repo = MongoDataRepository::new(client);
//!
//!     let filter = repo.operators().plain(bson::doc! { "is_test": true });
//!     let result = repo.find_one::<Post>("posts", &filter).await;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as datalayer_mongodb;

pub mod client;
pub mod cursor;
pub mod operators;
pub mod repository;

pub use client::{MongoClient, MongoConfig};
pub use operators::MongoOperators;
pub use repository::MongoDataRepository;
