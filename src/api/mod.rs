pub mod cors;
pub mod models;
pub mod movies;

// Re-exports
pub use models::*;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;

pub async fn root_handler() -> &'static str {
    "Hey boy"
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, total_movies) = match state.sampler.store().count().await {
        Ok(count) => (StatusCode::OK, count),
        Err(e) => {
            error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, 0)
        }
    };

    let health = if status.is_success() { "healthy" } else { "unhealthy" };
    (
        status,
        Json(HealthResponse {
            status: health.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            total_movies,
        }),
    )
}

/// Build the application router.
///
/// The CORS middleware wraps routing, so allowed-origin preflights are
/// answered before a route is matched. Unmatched paths get the greeting.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root_handler))
        .route("/health", get(health_handler))
        .merge(movies::routes())
        .fallback(root_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    cors::allow_single_origin,
                )),
        )
        .with_state(state)
}
