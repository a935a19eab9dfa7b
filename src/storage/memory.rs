use crate::storage::{Movie, MovieStore, StoreError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Which store call should fail
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Failure {
    Count,
    Query,
    Decode,
}

/// In-memory store for handler and sampler tests
#[derive(Default)]
pub struct MemoryStore {
    movies: Vec<Movie>,
    failure: Option<Failure>,
    fetches: Mutex<Vec<(u64, i64)>>,
}

impl MemoryStore {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            ..Self::default()
        }
    }

    /// Store holding `n` movies titled `movie-0` .. `movie-{n-1}`
    pub fn with_titles(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| Movie {
                    title: Some(format!("movie-{}", i)),
                    ..Movie::default()
                })
                .collect(),
        )
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// `(skip, limit)` of every fetch issued so far
    pub fn fetches(&self) -> Vec<(u64, i64)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn count(&self) -> Result<u64, StoreError> {
        if self.failure == Some(Failure::Count) {
            return Err(StoreError::Count("connection reset".to_string()));
        }
        Ok(self.movies.len() as u64)
    }

    async fn fetch(&self, skip: u64, limit: i64) -> Result<Vec<Movie>, StoreError> {
        self.fetches.lock().unwrap().push((skip, limit));
        match self.failure {
            Some(Failure::Query) => return Err(StoreError::Query("cursor not found".to_string())),
            Some(Failure::Decode) => {
                return Err(StoreError::Decode("invalid type: sequence".to_string()));
            }
            _ => {}
        }

        Ok(self
            .movies
            .iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
