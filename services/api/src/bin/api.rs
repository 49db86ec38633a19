//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, MyMemoryAdapter, OpenAiTranslationAdapter},
    config::{Config, TranslationBackend},
    error::ApiError,
    web::{self, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use storyland_core::ports::{KeyValueStore, TranslationService};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");
    if !config.bind_address.ip().is_loopback() {
        warn!(
            "Binding to {}; the host is meant to serve this device only",
            config.bind_address
        );
    }

    // --- 2. Open the Device Storage & Run Migrations ---
    info!("Opening local storage at {}...", config.database_url);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = DbAdapter::new(db_pool);
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");
    let store: Arc<dyn KeyValueStore> = Arc::new(db_adapter);

    // --- 3. Initialize the Translation Adapter ---
    let remote: Arc<dyn TranslationService> = match config.translation_backend {
        TranslationBackend::MyMemory => Arc::new(MyMemoryAdapter::new(
            config.translation_api_url.clone(),
            config.translation_timeout,
        )),
        TranslationBackend::OpenAi => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?;
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiTranslationAdapter::new(
                openai_client,
                config.translation_model.clone(),
            ))
        }
    };
    info!("Translation backend: {:?}", config.translation_backend);

    // --- 4. Build the Shared AppState & Router ---
    let bind_address = config.bind_address;
    let app_state = Arc::new(AppState::build(config, store, remote).await?);
    let shutdown = app_state.shutdown.clone();
    let app = web::router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped.");
    Ok(())
}

/// Resolves on Ctrl-C, cancelling `token` so open sockets close too.
async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for the shutdown signal: {}", e);
        // Without a signal handler, only an explicit cancel stops the server.
        token.cancelled().await;
        return;
    }
    info!("Shutdown signal received.");
    token.cancel();
}
