//! The persisted language preference.

use std::sync::Arc;
use tracing::warn;

use crate::domain::Language;
use crate::error::CoreResult;
use crate::ports::KeyValueStore;
use crate::storage_keys;

pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored language, or English if none (or an unknown code) is stored.
    pub async fn load_language(&self) -> CoreResult<Language> {
        let Some(raw) = self.store.get(storage_keys::LANGUAGE).await? else {
            return Ok(Language::default());
        };
        Ok(raw.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring stored language preference");
            Language::default()
        }))
    }

    pub async fn save_language(&self, language: Language) -> CoreResult<()> {
        self.store
            .put(storage_keys::LANGUAGE, language.code())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn defaults_to_english_and_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store.clone());
        assert_eq!(prefs.load_language().await.unwrap(), Language::English);

        prefs.save_language(Language::Arabic).await.unwrap();
        assert_eq!(store.get(storage_keys::LANGUAGE).await.unwrap().as_deref(), Some("ar"));
        assert_eq!(prefs.load_language().await.unwrap(), Language::Arabic);

        store.put(storage_keys::LANGUAGE, "klingon").await.unwrap();
        assert_eq!(prefs.load_language().await.unwrap(), Language::English);
    }
}
