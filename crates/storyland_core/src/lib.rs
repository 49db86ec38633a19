pub mod catalog;
pub mod cues;
pub mod domain;
pub mod error;
pub mod memory;
pub mod ports;
pub mod preferences;
pub mod profile;
pub mod progress;
pub mod seed;
pub mod storage_keys;
pub mod translation;
pub mod ui_strings;

pub use catalog::ContentCatalog;
pub use cues::{NarrationSession, NarrationUpdate, PlaybackEvent};
pub use domain::{
    CompletedStory, Language, Profile, ProgressSummary, SignupForm, Story, StoryId, StoryProgress,
    VocabularyEntry, WordTimestamp,
};
pub use error::{AuthFailure, CoreError, CoreResult, ValidationError, ValidationIssue};
pub use memory::MemoryStore;
pub use ports::{KeyValueStore, PortError, PortResult, TranslationService};
pub use preferences::Preferences;
pub use profile::ProfileStore;
pub use progress::{CompletionOutcome, ProgressLedger, DEFAULT_STARS_PER_STORY};
pub use translation::{Resolution, Tier, TranslatedStories, TranslationCache};
