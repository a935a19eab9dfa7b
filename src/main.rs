mod api;
mod config;
mod sampling;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::sampling::Sampler;
use crate::storage::{MongoSettings, MongoStore};
use axum::http::HeaderValue;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Movie Sample API Server");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };
    info!("📋 Configuration loaded");
    info!("   - Database: {}.{}", config.database.name, config.database.collection);
    info!("   - Sample size: {}", config.database.sample_size);
    info!("   - Allowed origin: {}", config.cors.allowed_origin);
    info!("   - Server: {}", config.listen_addr());

    // Connect to MongoDB
    info!("💾 Connecting to MongoDB...");
    let settings = MongoSettings {
        uri: config.mongo_uri.clone(),
        database: config.database.name.clone(),
        collection: config.database.collection.clone(),
        connect_timeout: config.database.connect_timeout(),
    };
    let store = match MongoStore::connect(&settings).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };
    info!("✅ Connected to MongoDB");

    // Create application state
    let state = AppState {
        sampler: Sampler::new(store, config.database.sample_size),
        allowed_origin: HeaderValue::from_str(&config.cors.allowed_origin)?,
    };

    let app = api::router(state);

    // Start server
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                 - Greeting");
    info!("   GET  /movies           - Random batch of movies");
    info!("   GET  /health           - Health check");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
