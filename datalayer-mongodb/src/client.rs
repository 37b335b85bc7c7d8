//! Connection management for the MongoDB adapter.

use bson::{Document, doc};
use mongodb::{Client, Collection, Database, options::ClientOptions};

use datalayer_core::error::{DataRepositoryError, DataRepositoryResult};

/// Connection configuration for [`MongoClient`].
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Name of the database the repository operates on.
    pub database: String,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self { uri: uri.into(), database: database.into() }
    }

    /// Loads the configuration from the `MONGO_URI` and `MONGO_DB` environment
    /// variables.
    pub fn from_env() -> DataRepositoryResult<Self> {
        let uri = std::env::var("MONGO_URI").map_err(|_| {
            DataRepositoryError::Initialization("MONGO_URI is not set".to_string())
        })?;
        let database = std::env::var("MONGO_DB").map_err(|_| {
            DataRepositoryError::Initialization("MONGO_DB is not set".to_string())
        })?;

        Ok(Self { uri, database })
    }
}

/// Owns the driver client and the database the repository operates on.
///
/// The client is established once via [`connect`](MongoClient::connect) and
/// released via [`close`](MongoClient::close); the repository borrows collections
/// from it for every operation.
#[derive(Debug)]
pub struct MongoClient {
    client: Client,
    database: String,
}

impl MongoClient {
    /// Connects to MongoDB with the given configuration.
    pub async fn connect(config: MongoConfig) -> DataRepositoryResult<Self> {
        let options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| DataRepositoryError::Initialization(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| DataRepositoryError::Initialization(e.to_string()))?;

        log::debug!("connected: database={}", config.database);

        Ok(Self { client, database: config.database })
    }

    /// Fetches a handle to the named collection.
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.database().collection(name)
    }

    /// Returns a handle to the configured database.
    pub fn database(&self) -> Database {
        self.client.database(&self.database)
    }

    /// Pings the server to verify the connection is alive.
    pub async fn ping(&self) -> DataRepositoryResult<()> {
        self.database()
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DataRepositoryError::Backend(e.to_string()))?;

        Ok(())
    }

    /// Closes the client and its underlying connections.
    pub async fn close(self) -> DataRepositoryResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}
