use crate::api::models::*;
use crate::storage::StoreError;
use axum::{extract::State, Json};
use tracing::error;

pub async fn sample_movies_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope>, AppError> {
    let movies = state.sampler.sample().await.map_err(|e| {
        error!("{}", e);
        match e {
            StoreError::Count(_) | StoreError::Query(_) => AppError::Internal("Error fetching movies"),
            StoreError::Decode(_) => AppError::Internal("Error decoding movies"),
        }
    })?;

    Ok(Json(Envelope::movies(movies)))
}
