//! crates/storyland_core/src/translation.rs
//!
//! The translation cache. A lookup walks four tiers in order:
//!
//! 1. the compiled-in UI string table (by UI string id, exact match),
//! 2. the durable cache, persisted under one storage key,
//! 3. the volatile cache, living as long as the process,
//! 4. the remote translation service, whose answers are written back to
//!    both caches.
//!
//! Any remote failure is logged and the source text is returned unchanged.
//! Entries are never invalidated: source strings are static.

use futures::future::join_all;
use futures::lock::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{Language, Story, VocabularyEntry};
use crate::error::{CoreError, CoreResult};
use crate::ports::{KeyValueStore, TranslationService};
use crate::storage_keys;
use crate::ui_strings;

/// Where a translated string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    UiDictionary,
    Durable,
    Volatile,
    Remote,
    /// No translation needed: empty text or an English target.
    Passthrough,
    /// The remote call failed; the text is the untranslated source.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub tier: Tier,
}

impl Resolution {
    fn new(text: impl Into<String>, tier: Tier) -> Self {
        Self {
            text: text.into(),
            tier,
        }
    }
}

fn cache_key(text: &str, target: Language) -> String {
    format!("{text}_{}", target.code())
}

/// A translated story set. `complete` is false when any string fell back
/// to the English source.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedStories {
    pub stories: Vec<Story>,
    pub complete: bool,
}

impl TranslatedStories {
    fn full(stories: Vec<Story>) -> Self {
        Self {
            stories,
            complete: true,
        }
    }
}

pub struct TranslationCache {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn TranslationService>,
    durable: RwLock<HashMap<String, String>>,
    volatile: RwLock<HashMap<String, String>>,
    /// Serialises durable write-back so a stale snapshot never overwrites a
    /// newer one.
    persist_lock: Mutex<()>,
    mirrors: RwLock<HashMap<Language, Vec<Story>>>,
}

impl TranslationCache {
    /// Builds a cache with empty tiers.
    pub fn new(store: Arc<dyn KeyValueStore>, remote: Arc<dyn TranslationService>) -> Self {
        Self {
            store,
            remote,
            durable: RwLock::new(HashMap::new()),
            volatile: RwLock::new(HashMap::new()),
            persist_lock: Mutex::new(()),
            mirrors: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a cache whose durable tier is read from storage. A corrupt blob
    /// is discarded; it only holds re-fetchable translations.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn TranslationService>,
    ) -> CoreResult<Self> {
        let cache = Self::new(store, remote);
        if let Some(raw) = cache.store.get(storage_keys::OFFLINE_TRANSLATIONS).await? {
            match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => {
                    info!(entries = entries.len(), "Offline translations loaded");
                    *cache.durable.write().unwrap_or_else(PoisonError::into_inner) = entries;
                }
                Err(e) => warn!(error = %e, "Discarding unreadable offline translations"),
            }
        }
        Ok(cache)
    }

    /// Number of entries in the durable tier.
    pub fn durable_len(&self) -> usize {
        self.durable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Translates `text` into `target`, returning `text` itself on failure.
    pub async fn translate(&self, text: &str, target: Language) -> String {
        self.resolve(text, target).await.text
    }

    /// Like [`translate`](Self::translate), also reporting which tier answered.
    pub async fn resolve(&self, text: &str, target: Language) -> Resolution {
        if text.trim().is_empty() {
            return Resolution::new(text, Tier::Passthrough);
        }
        if let Some(ui) = ui_strings::lookup(text, target) {
            debug!(id = text, %target, "Translation served from UI dictionary");
            return Resolution::new(ui, Tier::UiDictionary);
        }
        if target.is_source() {
            return Resolution::new(text, Tier::Passthrough);
        }

        let key = cache_key(text, target);
        let durable_hit = self
            .durable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(hit) = durable_hit {
            debug!(%target, "Translation served from durable cache");
            return Resolution::new(hit, Tier::Durable);
        }
        let volatile_hit = self
            .volatile
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(hit) = volatile_hit {
            debug!(%target, "Translation served from volatile cache");
            return Resolution::new(hit, Tier::Volatile);
        }

        match self.remote.translate(text, target).await {
            Ok(translated) if !translated.trim().is_empty() => {
                self.write_back(key, &translated).await;
                Resolution::new(translated, Tier::Remote)
            }
            Ok(_) => {
                warn!(%target, "Remote translation was empty; using source text");
                Resolution::new(text, Tier::Fallback)
            }
            Err(e) => {
                warn!(%target, error = %e, "Remote translation failed; using source text");
                Resolution::new(text, Tier::Fallback)
            }
        }
    }

    /// Records a remote answer in the volatile tier, then in the durable tier.
    /// If persisting fails the durable tier is left as it was.
    async fn write_back(&self, key: String, translated: &str) {
        self.volatile
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), translated.to_string());

        let _guard = self.persist_lock.lock().await;
        let (snapshot, was_new) = {
            let mut durable = self.durable.write().unwrap_or_else(PoisonError::into_inner);
            let was_new = durable
                .insert(key.clone(), translated.to_string())
                .is_none();
            (durable.clone(), was_new)
        };

        let persisted = match serde_json::to_string(&snapshot) {
            Ok(json) => self
                .store
                .put(storage_keys::OFFLINE_TRANSLATIONS, &json)
                .await
                .map_err(CoreError::from),
            Err(e) => Err(CoreError::Corrupt {
                key: storage_keys::OFFLINE_TRANSLATIONS.to_string(),
                reason: e.to_string(),
            }),
        };
        if let Err(e) = persisted {
            warn!(error = %e, "Could not persist offline translation");
            if was_new {
                self.durable
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&key);
            }
        }
    }

    /// Translates the language-dependent fields of a story. Illustration,
    /// audio and timestamps pass through unchanged.
    pub async fn translate_story(&self, story: &Story, target: Language) -> Story {
        self.translate_story_checked(story, target).await.0
    }

    /// Returns the translated story and whether every field resolved without
    /// falling back to the source text.
    async fn translate_story_checked(&self, story: &Story, target: Language) -> (Story, bool) {
        let (title, description, content) = futures::join!(
            self.resolve(&story.title, target),
            self.resolve(&story.description, target),
            self.resolve(&story.content, target)
        );
        let vocabulary = join_all(story.vocabulary.iter().map(|entry| async move {
            let (word, definition) = futures::join!(
                self.resolve(&entry.word, target),
                self.resolve(&entry.definition, target)
            );
            (word, definition)
        }))
        .await;

        let mut complete = [&title, &description, &content]
            .iter()
            .all(|r| r.tier != Tier::Fallback);
        let vocabulary = vocabulary
            .into_iter()
            .map(|(word, definition)| {
                complete &= word.tier != Tier::Fallback && definition.tier != Tier::Fallback;
                VocabularyEntry {
                    word: word.text,
                    definition: definition.text,
                }
            })
            .collect();

        let translated = Story {
            title: title.text,
            description: description.text,
            content: content.text,
            vocabulary,
            ..story.clone()
        };
        (translated, complete)
    }

    /// Translates every story concurrently.
    ///
    /// A fully translated set is kept as the mirror for `target` and returned
    /// on later calls. A set with any fallback is returned but not kept, so a
    /// later call retries the missing strings.
    pub async fn translate_all(&self, stories: &[Story], target: Language) -> TranslatedStories {
        if target.is_source() {
            return TranslatedStories::full(stories.to_vec());
        }
        if let Some(mirror) = self.cached_mirror(target) {
            return TranslatedStories::full(mirror);
        }

        let results = join_all(
            stories
                .iter()
                .map(|story| self.translate_story_checked(story, target)),
        )
        .await;
        let complete = results.iter().all(|(_, ok)| *ok);
        let translated: Vec<Story> = results.into_iter().map(|(story, _)| story).collect();

        if !complete {
            warn!(%target, "Story mirror incomplete; will retry on next request");
            return TranslatedStories {
                stories: translated,
                complete: false,
            };
        }

        info!(%target, stories = translated.len(), "Story mirror translated");
        // A concurrent build may have finished first; its mirror wins.
        let mirror = self
            .mirrors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target)
            .or_insert(translated)
            .clone();
        TranslatedStories::full(mirror)
    }

    /// The memoised mirror for `target`, if a complete one was built.
    pub fn cached_mirror(&self, target: Language) -> Option<Vec<Story>> {
        self.mirrors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target)
            .cloned()
    }

    /// The complete UI string table for `language`.
    pub fn translate_ui(&self, language: Language) -> BTreeMap<&'static str, &'static str> {
        ui_strings::table(language)
    }
}
