use crate::storage::{Movie, MovieStore, StoreError};
use rand::Rng;
use std::sync::Arc;
use tracing::info;

/// Default number of movies returned per sample
pub const SAMPLE_SIZE: i64 = 10;

/// Pick a starting offset in `[0, count)`, or `None` for an empty collection
pub fn random_offset<R: Rng + ?Sized>(count: u64, rng: &mut R) -> Option<u64> {
    (count > 0).then(|| rng.gen_range(0..count))
}

/// Source of sample offsets
pub trait OffsetSource: Send + Sync {
    /// Offset in `[0, count)`; only called with `count > 0`
    fn offset(&self, count: u64) -> u64;
}

/// Draws from the thread-local RNG on every call
pub struct ThreadRngOffsets;

impl OffsetSource for ThreadRngOffsets {
    fn offset(&self, count: u64) -> u64 {
        random_offset(count, &mut rand::thread_rng()).unwrap_or(0)
    }
}

/// Returns a contiguous run of movies starting at a random offset.
///
/// This is not a uniform sample of individual documents: the batch is the
/// `size` documents following the offset in natural order, shorter when the
/// offset is near the end of the collection.
#[derive(Clone)]
pub struct Sampler {
    store: Arc<dyn MovieStore>,
    offsets: Arc<dyn OffsetSource>,
    size: i64,
}

impl Sampler {
    pub fn new(store: Arc<dyn MovieStore>, size: i64) -> Self {
        Self::with_offsets(store, Arc::new(ThreadRngOffsets), size)
    }

    pub fn with_offsets(store: Arc<dyn MovieStore>, offsets: Arc<dyn OffsetSource>, size: i64) -> Self {
        Self { store, offsets, size }
    }

    pub fn store(&self) -> &dyn MovieStore {
        self.store.as_ref()
    }

    pub async fn sample(&self) -> Result<Vec<Movie>, StoreError> {
        let count = self.store.count().await?;
        if count == 0 {
            info!(count, "Collection is empty");
            return Ok(Vec::new());
        }

        let offset = self.offsets.offset(count).min(count - 1);
        let movies = self.store.fetch(offset, self.size).await?;

        info!(count, offset, returned = movies.len(), "Sampled movies");
        Ok(movies)
    }
}
