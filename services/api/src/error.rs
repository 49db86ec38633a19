//! services/api/src/error.rs
//!
//! Defines the primary error type for the host service, and the mapping of
//! core errors onto HTTP responses.

use crate::config::ConfigError;
use axum::http::StatusCode;
use storyland_core::CoreError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from one of the core components.
    #[error("Core Error: {0}")]
    Core(#[from] CoreError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error while applying the embedded migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Maps a core error to the status code and message returned to the client.
pub fn core_error_response(err: &CoreError) -> (StatusCode, String) {
    match err {
        CoreError::Validation(validation) => (StatusCode::BAD_REQUEST, validation.to_string()),
        CoreError::Auth(_) => (
            StatusCode::UNAUTHORIZED,
            "Invalid name or PIN".to_string(),
        ),
        CoreError::StoryNotFound(id) => (StatusCode::NOT_FOUND, format!("Story {id} not found")),
        CoreError::Storage(_) | CoreError::Corrupt { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Storage error".to_string(),
        ),
    }
}
