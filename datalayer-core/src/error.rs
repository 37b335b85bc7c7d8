//! Error types and result types for data repository operations.
//!
//! Repository operations never panic and never throw through the result
//! abstractions: underlying failures are converted into a [`DataRepositoryError`]
//! recorded on the result value, to be checked explicitly by the caller.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a data repository.
#[derive(Error, Debug)]
pub enum DataRepositoryError {
    /// Serialization/deserialization error when converting documents (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during client construction or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The value handed to the repository is not a document-shaped value.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error reported by the underlying store while executing an operation.
    #[error("Backend error: {0}")]
    Backend(String),
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for data repository operations.
pub type DataRepositoryResult<T> = Result<T, DataRepositoryError>;

impl From<BsonError> for DataRepositoryError {
    fn from(err: BsonError) -> Self {
        DataRepositoryError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DataRepositoryError {
    fn from(err: SerdeJsonError) -> Self {
        DataRepositoryError::Serialization(err.to_string())
    }
}
