//! A thin, storage-agnostic data-access abstraction for document-oriented persistence.
//!
//! This crate is the core of the datalayer project and provides:
//!
//! - **Operator builder** ([`operators`]) - Fluent, accumulating filter/update expression builder
//! - **Result abstractions** ([`result`]) - Uniform single-document and cursor-based read contracts
//! - **Raw cursor capability** ([`cursor`]) - The interface a store adapter's driver cursor must satisfy
//! - **Repository contract** ([`repository`]) - CRUD and query operations over named collections
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! Application code builds an expression through the operator builder, hands it to a
//! repository operation and drives the returned result abstraction to completion. The
//! underlying store can be swapped without touching call sites.
//!
//! # Example
//!
//! ```ignore
//! use datalayer_core::{operators::Operators, repository::DataRepository};
//!
//! let filter = repo.operators()
//!     .plain(doc! { "is_test": true })
//!     .search("foo");
//!
//! let mut posts = repo.find::<Post>("posts", &filter, FindOptions::default()).await;
//! while posts.next().await {
//!     if let Some(post) = posts.decode() {
//!         println!("{}", post.name);
//!     }
//! }
//! posts.close().await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as datalayer_core;

pub mod cursor;
pub mod error;
pub mod operators;
pub mod repository;
pub mod result;
