//! crates/storyland_core/src/catalog.rs
//!
//! The content catalog: the English story set plus any translated mirrors.
//! Lookups never fail for lack of a mirror; they degrade to English.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::cues;
use crate::domain::{Language, Story, StoryId};
use crate::error::{CoreError, CoreResult};
use crate::ports::KeyValueStore;
use crate::seed;
use crate::storage_keys;

pub struct ContentCatalog {
    store: Arc<dyn KeyValueStore>,
    english: Vec<Story>,
    mirrors: RwLock<HashMap<Language, Vec<Story>>>,
}

impl ContentCatalog {
    pub fn new(store: Arc<dyn KeyValueStore>, english: Vec<Story>) -> Self {
        Self {
            store,
            english,
            mirrors: RwLock::new(HashMap::new()),
        }
    }

    /// A catalog holding the built-in story set.
    pub fn seeded(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, seed::english_stories())
    }

    /// The source-language stories.
    pub fn english(&self) -> &[Story] {
        &self.english
    }

    fn mirror(&self, language: Language) -> Option<Vec<Story>> {
        if language.is_source() {
            return None;
        }
        self.mirrors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&language)
            .filter(|stories| !stories.is_empty())
            .cloned()
    }

    pub fn has_mirror(&self, language: Language) -> bool {
        self.mirror(language).is_some()
    }

    /// The stories for `language`, or the English set when no mirror exists.
    pub fn stories(&self, language: Language) -> Vec<Story> {
        self.mirror(language)
            .unwrap_or_else(|| self.english.clone())
    }

    /// Looks a story up by id. A mirror missing the id falls back to English.
    pub fn find_story(&self, id: StoryId, language: Language) -> CoreResult<Story> {
        self.mirror(language)
            .and_then(|stories| stories.into_iter().find(|s| s.id == id))
            .or_else(|| self.english.iter().find(|s| s.id == id).cloned())
            .ok_or(CoreError::StoryNotFound(id))
    }

    /// Records a translated mirror and persists it for offline use.
    pub async fn install_mirror(&self, language: Language, stories: Vec<Story>) -> CoreResult<()> {
        if language.is_source() || stories.is_empty() {
            return Ok(());
        }

        let key = storage_keys::mirror(language);
        let json = serde_json::to_string(&stories).map_err(|e| CoreError::Corrupt {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.put(&key, &json).await?;

        info!(%language, stories = stories.len(), "Story mirror installed");
        self.mirrors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(language, stories);
        Ok(())
    }

    /// Reloads persisted mirrors at startup. Unreadable mirrors are skipped,
    /// leaving that language on the English fallback. A mirror whose word
    /// timings are out of order is deleted from storage as well.
    pub async fn restore_mirrors(&self) -> CoreResult<usize> {
        let mut restored = 0;
        for language in [Language::Arabic] {
            let key = storage_keys::mirror(language);
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<Vec<Story>>(&raw) {
                Ok(stories) if stories.is_empty() => {}
                Ok(stories) => {
                    let disordered = stories
                        .iter()
                        .find(|s| !cues::is_well_ordered(&s.timestamps));
                    if let Some(story) = disordered {
                        warn!(
                            %language,
                            story_id = story.id,
                            "Discarding story mirror with disordered word timings"
                        );
                        self.store.remove(&key).await?;
                        continue;
                    }
                    self.mirrors
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(language, stories);
                    restored += 1;
                }
                Err(e) => warn!(%language, error = %e, "Ignoring unreadable story mirror"),
            }
        }
        Ok(restored)
    }
}
