//! crates/storyland_core/src/progress.rs
//!
//! The progress ledger: per-profile story completion and star accounting.
//!
//! Completion is a one-time transition. Once a story is marked completed for a
//! profile, replaying the completion event changes nothing, so stars can never
//! be counted twice.

use chrono::Utc;
use futures::lock::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{CompletedStory, ProgressSummary, StoryId, StoryProgress};
use crate::error::{CoreError, CoreResult};
use crate::ports::KeyValueStore;
use crate::storage_keys;

/// Stars granted for finishing a story unless configured otherwise.
pub const DEFAULT_STARS_PER_STORY: u32 = 3;

type Ledger = BTreeMap<StoryId, StoryProgress>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The story was completed for the first time and earned `stars`.
    FirstCompletion { stars: u32 },
    /// The story had already been completed; nothing changed.
    AlreadyCompleted,
}

pub struct ProgressLedger {
    store: Arc<dyn KeyValueStore>,
    /// Ledgers loaded so far, keyed by profile id. The async lock is held
    /// across the storage write so mutations are applied one at a time.
    ledgers: Mutex<HashMap<Uuid, Ledger>>,
}

impl ProgressLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            ledgers: Mutex::new(HashMap::new()),
        }
    }

    async fn read_ledger(&self, profile_id: Uuid) -> CoreResult<Ledger> {
        let key = storage_keys::progress(profile_id);
        match self.store.get(&key).await? {
            None => Ok(Ledger::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| CoreError::Corrupt {
                key,
                reason: e.to_string(),
            }),
        }
    }

    /// Returns a copy of the profile's ledger, loading it on first access.
    async fn snapshot(&self, profile_id: Uuid) -> CoreResult<Ledger> {
        let mut ledgers = self.ledgers.lock().await;
        if let Some(ledger) = ledgers.get(&profile_id) {
            return Ok(ledger.clone());
        }
        let ledger = self.read_ledger(profile_id).await?;
        debug!(%profile_id, entries = ledger.len(), "Progress ledger loaded");
        ledgers.insert(profile_id, ledger.clone());
        Ok(ledger)
    }

    /// Marks `story_id` completed for `profile_id`, awarding `stars` only on
    /// the first completion.
    ///
    /// The full ledger is persisted before the in-memory copy changes; if the
    /// write fails both stay at the previous version.
    pub async fn record_completion(
        &self,
        profile_id: Uuid,
        story_id: StoryId,
        stars: u32,
    ) -> CoreResult<CompletionOutcome> {
        let mut ledgers = self.ledgers.lock().await;
        let current = match ledgers.get(&profile_id) {
            Some(ledger) => ledger.clone(),
            None => self.read_ledger(profile_id).await?,
        };

        if current.get(&story_id).is_some_and(|entry| entry.completed) {
            debug!(%profile_id, story_id, "Story already completed; no stars awarded");
            ledgers.insert(profile_id, current);
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        let mut updated = current;
        updated.insert(
            story_id,
            StoryProgress {
                completed: true,
                stars,
                completed_at: Utc::now(),
            },
        );

        let key = storage_keys::progress(profile_id);
        let json = serde_json::to_string(&updated).map_err(|e| CoreError::Corrupt {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.put(&key, &json).await?;
        ledgers.insert(profile_id, updated);

        info!(%profile_id, story_id, stars, "Story completed");
        Ok(CompletionOutcome::FirstCompletion { stars })
    }

    pub async fn is_completed(&self, profile_id: Uuid, story_id: StoryId) -> CoreResult<bool> {
        let ledger = self.snapshot(profile_id).await?;
        Ok(ledger.get(&story_id).is_some_and(|entry| entry.completed))
    }

    pub async fn total_stars(&self, profile_id: Uuid) -> CoreResult<u32> {
        Ok(self.summary(profile_id).await?.total_stars)
    }

    pub async fn completed_count(&self, profile_id: Uuid) -> CoreResult<usize> {
        Ok(self.summary(profile_id).await?.completed_count)
    }

    /// Completed stories ordered by story id, with their totals.
    pub async fn summary(&self, profile_id: Uuid) -> CoreResult<ProgressSummary> {
        let ledger = self.snapshot(profile_id).await?;
        let completed: Vec<CompletedStory> = ledger
            .into_iter()
            .filter(|(_, entry)| entry.completed)
            .map(|(story_id, entry)| CompletedStory {
                story_id,
                stars: entry.stars,
                completed_at: entry.completed_at,
            })
            .collect();

        Ok(ProgressSummary {
            total_stars: completed
                .iter()
                .fold(0u32, |total, c| total.saturating_add(c.stars)),
            completed_count: completed.len(),
            completed,
        })
    }
}
