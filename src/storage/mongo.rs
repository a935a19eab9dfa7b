use crate::storage::{Movie, MovieStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection};
use std::time::Duration;
use tracing::info;

/// Where to find the movie collection
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub connect_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Invalid MongoDB connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),
    #[error("Failed to create MongoDB client: {0}")]
    Client(#[source] mongodb::error::Error),
    #[error("MongoDB ping failed: {0}")]
    Ping(#[source] mongodb::error::Error),
    #[error("MongoDB did not answer within {0:?}")]
    Timeout(Duration),
}

/// MongoDB-backed movie store
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Movie>,
}

impl MongoStore {
    /// Connect and verify the server answers a ping within the timeout
    pub async fn connect(settings: &MongoSettings) -> Result<Self, ConnectError> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(ConnectError::InvalidUri)?;
        options.connect_timeout = Some(settings.connect_timeout);
        options.server_selection_timeout = Some(settings.connect_timeout);

        let client = Client::with_options(options).map_err(ConnectError::Client)?;

        let ping = async { client.database("admin").run_command(doc! { "ping": 1 }).await };
        match tokio::time::timeout(settings.connect_timeout, ping).await {
            Ok(result) => {
                result.map_err(ConnectError::Ping)?;
            }
            Err(_) => return Err(ConnectError::Timeout(settings.connect_timeout)),
        }

        info!(
            database = %settings.database,
            collection = %settings.collection,
            "Connected to MongoDB"
        );

        Ok(Self {
            collection: client
                .database(&settings.database)
                .collection(&settings.collection),
        })
    }
}

#[async_trait]
impl MovieStore for MongoStore {
    async fn count(&self) -> Result<u64, StoreError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| StoreError::Count(e.to_string()))
    }

    async fn fetch(&self, skip: u64, limit: i64) -> Result<Vec<Movie>, StoreError> {
        let mut options = FindOptions::default();
        options.skip = Some(skip);
        options.limit = Some(limit);

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        cursor.try_collect().await.map_err(|e| match *e.kind {
            ErrorKind::BsonDeserialization(_) => StoreError::Decode(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        })
    }
}
