//! Durable storage keys. One scheme for every persisted record.

use uuid::Uuid;

use crate::domain::Language;

pub const PROFILE: &str = "storyland-profile";
pub const LANGUAGE: &str = "storyland-language";
pub const OFFLINE_TRANSLATIONS: &str = "storyland-offline-translations";

/// Progress ledger of one profile.
pub fn progress(profile_id: Uuid) -> String {
    format!("storyland-progress-{profile_id}")
}

/// Translated story mirror for one language, e.g. `storyland-ar-stories`.
pub fn mirror(language: Language) -> String {
    format!("storyland-{}-stories", language.code())
}
