use crate::sampling::Sampler;
use crate::storage::Movie;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub sampler: Sampler,
    pub allowed_origin: HeaderValue,
}

/// Uniform wrapper for `/movies` replies.
///
/// Only built through [`Envelope::movies`] and [`Envelope::empty`], so a
/// success code always carries movies and the empty code never does.
#[derive(Debug, Serialize)]
pub struct Envelope {
    message: &'static str,
    response: Option<Vec<Movie>>,
    code: u8,
}

impl Envelope {
    pub const SUCCESS: u8 = 0;
    pub const EMPTY: u8 = 1;

    /// Successful sample; falls back to the empty envelope for no movies
    pub fn movies(movies: Vec<Movie>) -> Self {
        if movies.is_empty() {
            return Self::empty();
        }
        Self {
            message: "Movies fetched successfully",
            response: Some(movies),
            code: Self::SUCCESS,
        }
    }

    pub fn empty() -> Self {
        Self {
            message: "No movies found",
            response: None,
            code: Self::EMPTY,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_movies: u64,
}

/// Application error type.
///
/// Rendered as a plain-text body; the detailed cause is logged where the
/// error is raised.
#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_pairs_code_zero_with_movies() {
        let envelope = Envelope::movies(vec![Movie::default()]);
        assert_eq!(envelope.code, Envelope::SUCCESS);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["message"], "Movies fetched successfully");
        assert_eq!(json["code"], 0);
        assert_eq!(json["response"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_pairs_code_one_with_null() {
        for envelope in [Envelope::empty(), Envelope::movies(Vec::new())] {
            assert_eq!(envelope.code, Envelope::EMPTY);
            assert!(envelope.response.is_none());

            let json = serde_json::to_value(&envelope).unwrap();
            assert_eq!(json["message"], "No movies found");
            assert_eq!(json["code"], 1);
            assert!(json["response"].is_null());
        }
    }
}
