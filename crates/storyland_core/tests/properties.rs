//! End-to-end behaviour of the core components against in-memory storage and
//! a scripted translation service.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use storyland_core::cues::word_at;
use storyland_core::{
    storage_keys, CompletionOutcome, ContentCatalog, CoreError, KeyValueStore, Language,
    MemoryStore, PortError, PortResult, ProfileStore, ProgressLedger, SignupForm, Story, Tier,
    TranslationCache, TranslationService, WordTimestamp,
};

/// Counts calls and answers according to `mode`.
struct ScriptedTranslator {
    calls: AtomicUsize,
    fail: bool,
}

impl ScriptedTranslator {
    fn working() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn offline() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationService for ScriptedTranslator {
    async fn translate(&self, text: &str, _target: Language) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(PortError::Unexpected("network unreachable".to_string()))
        } else {
            Ok(format!("[ar] {text}"))
        }
    }
}

fn signup(name: &str, age: i64, pin: &str, confirm: &str) -> SignupForm {
    SignupForm {
        name: name.to_string(),
        age: Some(age),
        pin: pin.to_string(),
        confirm_pin: confirm.to_string(),
    }
}

#[tokio::test]
async fn repeated_completion_awards_stars_once() {
    let ledger = ProgressLedger::new(Arc::new(MemoryStore::new()));
    let profile = uuid::Uuid::now_v7();

    let first = ledger.record_completion(profile, 7, 3).await.unwrap();
    let second = ledger.record_completion(profile, 7, 3).await.unwrap();

    assert_eq!(first, CompletionOutcome::FirstCompletion { stars: 3 });
    assert_eq!(second, CompletionOutcome::AlreadyCompleted);
    assert_eq!(ledger.total_stars(profile).await.unwrap(), 3);
    assert_eq!(ledger.completed_count(profile).await.unwrap(), 1);
    assert!(ledger.is_completed(profile, 7).await.unwrap());
}

#[tokio::test]
async fn profile_survives_reload_and_name_is_case_insensitive() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let created = ProfileStore::new(store.clone())
        .create_profile(signup("Mona", 6, "1234", "1234"))
        .await
        .unwrap();

    let reopened = ProfileStore::new(store);
    assert_eq!(reopened.load().await.unwrap(), Some(created.clone()));

    let logged_in = reopened.authenticate("mona", "1234").await.unwrap();
    assert_eq!(logged_in, created);
    assert_eq!(reopened.active(), Some(created));
}

#[tokio::test]
async fn short_name_and_short_pin_are_both_reported() {
    let store = Arc::new(MemoryStore::new());
    let profiles = ProfileStore::new(store.clone());

    let err = profiles
        .create_profile(signup("A", 6, "12", "12"))
        .await
        .unwrap_err();
    match err {
        CoreError::Validation(validation) => assert_eq!(validation.issues.len(), 2),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_translation_returns_source_and_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let remote = ScriptedTranslator::offline();
    let cache = TranslationCache::new(store.clone(), remote.clone());

    assert_eq!(cache.translate("Hello", Language::Arabic).await, "Hello");
    assert_eq!(remote.calls(), 1);
    assert_eq!(cache.durable_len(), 0);
    assert!(store
        .get(storage_keys::OFFLINE_TRANSLATIONS)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn durable_hit_skips_the_remote_call() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(
            storage_keys::OFFLINE_TRANSLATIONS,
            r#"{"Hello_ar":"مرحبا"}"#,
        )
        .await
        .unwrap();
    let remote = ScriptedTranslator::working();
    let cache = TranslationCache::load(store, remote.clone()).await.unwrap();

    let resolution = cache.resolve("Hello", Language::Arabic).await;
    assert_eq!(resolution.text, "مرحبا");
    assert_eq!(resolution.tier, Tier::Durable);
    assert_eq!(remote.calls(), 0);
}

#[test]
fn cue_lookup_matches_positions() {
    let mut story: Story = storyland_core::seed::english_stories().remove(0);
    story.timestamps = vec![
        WordTimestamp {
            word: "Hello".to_string(),
            start: 0.0,
            end: 0.5,
        },
        WordTimestamp {
            word: "world".to_string(),
            start: 0.5,
            end: 1.0,
        },
    ];

    assert_eq!(word_at(&story, 0.3), Some(0));
    assert_eq!(word_at(&story, 0.9), Some(1));
    assert_eq!(word_at(&story, 5.0), None);
}

#[test]
fn arabic_catalog_falls_back_to_english() {
    let catalog = ContentCatalog::seeded(Arc::new(MemoryStore::new()));
    let stories = catalog.stories(Language::Arabic);
    assert!(!stories.is_empty());
    assert_eq!(stories, catalog.stories(Language::English));
}

#[tokio::test]
async fn language_switch_builds_a_mirror_that_works_offline() {
    let store = Arc::new(MemoryStore::new());
    let catalog = ContentCatalog::seeded(store.clone());
    let online = TranslationCache::new(store.clone(), ScriptedTranslator::working());

    let mirror = online.translate_all(catalog.english(), Language::Arabic).await;
    assert!(mirror.complete);
    assert_eq!(online.cached_mirror(Language::Arabic), Some(mirror.stories.clone()));
    catalog
        .install_mirror(Language::Arabic, mirror.stories)
        .await
        .unwrap();
    assert_eq!(
        catalog.find_story(2, Language::Arabic).unwrap().title,
        "[ar] Bear's Honey Hunt"
    );

    // Restart without network: both the mirror and single strings survive.
    let offline_remote = ScriptedTranslator::offline();
    let offline = TranslationCache::load(store.clone(), offline_remote.clone())
        .await
        .unwrap();
    let restarted = ContentCatalog::seeded(store);
    restarted.restore_mirrors().await.unwrap();

    assert_eq!(
        restarted.find_story(1, Language::Arabic).unwrap().title,
        "[ar] Bunny's Big Day"
    );
    assert_eq!(
        offline.translate("Smart and quick to learn", Language::Arabic).await,
        "[ar] Smart and quick to learn"
    );
    assert_eq!(offline_remote.calls(), 0);
}
