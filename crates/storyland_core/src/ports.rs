//! crates/storyland_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture, so the core
//! stays independent of the concrete storage engine and translation provider.

use async_trait::async_trait;

use crate::domain::Language;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Device-local durable key/value storage.
///
/// Each `put` replaces the whole value under `key` in one step; callers rely on
/// this to keep persisted records either fully old or fully new.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> PortResult<()>;

    /// Deletes whatever is stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// A remote machine-translation capability. Source text is always English.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates `text` into `target`, failing on any network or API error.
    async fn translate(&self, text: &str, target: Language) -> PortResult<String>;
}
