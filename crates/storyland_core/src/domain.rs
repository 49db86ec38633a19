//! crates/storyland_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! The serialized shapes double as the persisted record formats, so field
//! names follow the camelCase layout used in device storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable numeric id shared by a story and all of its translated mirrors.
pub type StoryId = u32;

//=========================================================================================
// Language
//=========================================================================================

/// The two content languages. English is always the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub const SOURCE: Language = Language::English;

    /// The two-letter code used in storage keys and on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    pub fn is_source(self) -> bool {
        self == Self::SOURCE
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::SOURCE
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "ar" => Ok(Language::Arabic),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

//=========================================================================================
// Profile
//=========================================================================================

/// The single local user identity stored on the device.
///
/// The PIN is kept in plaintext; hardening it is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    pub pin: String,
    pub created_at: DateTime<Utc>,
}

/// Raw signup input as typed by the user; validated by the profile store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub age: Option<i64>,
    pub pin: String,
    pub confirm_pin: String,
}

//=========================================================================================
// Progress
//=========================================================================================

/// One ledger entry: the completion record of a single story for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryProgress {
    pub completed: bool,
    pub stars: u32,
    pub completed_at: DateTime<Utc>,
}

/// A completed story as reported in a progress summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedStory {
    pub story_id: StoryId,
    pub stars: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_stars: u32,
    pub completed_count: usize,
    pub completed: Vec<CompletedStory>,
}

impl ProgressSummary {
    /// Stars earned for `story_id`, if it was completed.
    pub fn stars_for(&self, story_id: StoryId) -> Option<u32> {
        self.completed
            .iter()
            .find(|c| c.story_id == story_id)
            .map(|c| c.stars)
    }

    /// Completed share of a catalog of `total_stories`, rounded to the
    /// nearest whole percent. An empty catalog is 0%.
    pub fn percent_complete(&self, total_stories: usize) -> u32 {
        if total_stories == 0 {
            return 0;
        }
        let done = self.completed_count.min(total_stories) as f64;
        (done * 100.0 / total_stories as f64).round() as u32
    }
}

//=========================================================================================
// Stories
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub definition: String,
}

/// The narration span of one word, in seconds from the start of the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// A story record. The English set is the source of truth; translated
/// mirrors share the same `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub description: String,
    pub content: String,
    pub vocabulary: Vec<VocabularyEntry>,
    pub illustration: String,
    pub audio_url: String,
    #[serde(default)]
    pub timestamps: Vec<WordTimestamp>,
}
