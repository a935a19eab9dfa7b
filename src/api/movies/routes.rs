use crate::api::models::AppState;
use crate::api::movies::handlers::sample_movies_handler;
use axum::{routing::any, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies", any(sample_movies_handler))
}
