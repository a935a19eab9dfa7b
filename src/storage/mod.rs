#[cfg(test)]
pub mod memory;
pub mod mongo;
pub mod movie;

pub use mongo::{MongoSettings, MongoStore};
pub use movie::Movie;

use async_trait::async_trait;

/// Read-only access to the movie collection
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Total number of documents in the collection
    async fn count(&self) -> Result<u64, StoreError>;

    /// Up to `limit` documents in natural order, after skipping `skip`
    async fn fetch(&self, skip: u64, limit: i64) -> Result<Vec<Movie>, StoreError>;
}

/// Per-request storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Error counting documents: {0}")]
    Count(String),
    #[error("Error fetching movies: {0}")]
    Query(String),
    #[error("Error decoding movies: {0}")]
    Decode(String),
}
