//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and how it is assembled at startup.

use crate::config::Config;
use std::sync::Arc;
use storyland_core::ports::{KeyValueStore, TranslationService};
use storyland_core::{
    ContentCatalog, CoreResult, Preferences, ProfileStore, ProgressLedger, TranslationCache,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub profiles: Arc<ProfileStore>,
    pub ledger: Arc<ProgressLedger>,
    pub catalog: Arc<ContentCatalog>,
    pub translator: Arc<TranslationCache>,
    pub preferences: Arc<Preferences>,
    /// Cancelled when the server begins shutting down; open narration
    /// sockets close when they see it.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wires the core components onto one storage backend and one remote
    /// translator, then reloads everything persisted by a previous run.
    pub async fn build(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn TranslationService>,
    ) -> CoreResult<Self> {
        let profiles = ProfileStore::new(store.clone());
        if let Some(profile) = profiles.load().await? {
            info!(profile_id = %profile.id, "Found a stored profile");
        }

        let translator = TranslationCache::load(store.clone(), remote).await?;
        let catalog = ContentCatalog::seeded(store.clone());
        let restored = catalog.restore_mirrors().await?;
        info!(
            cached_translations = translator.durable_len(),
            restored_mirrors = restored,
            "Application state ready"
        );

        Ok(Self {
            config: Arc::new(config),
            profiles: Arc::new(profiles),
            ledger: Arc::new(ProgressLedger::new(store.clone())),
            catalog: Arc::new(catalog),
            translator: Arc::new(translator),
            preferences: Arc::new(Preferences::new(store)),
            shutdown: CancellationToken::new(),
        })
    }
}
