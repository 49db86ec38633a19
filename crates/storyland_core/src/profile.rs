//! crates/storyland_core/src/profile.rs
//!
//! The profile store: signup validation, credential checks, and the single
//! active-profile reference of the device.

use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Profile, SignupForm};
use crate::error::{AuthFailure, CoreError, CoreResult, ValidationError, ValidationIssue};
use crate::ports::KeyValueStore;
use crate::storage_keys;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_AGE: u8 = 4;
pub const MAX_AGE: u8 = 10;

fn pin_pattern() -> &'static Regex {
    static PIN: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only; `\d` would also accept other Unicode digit sets.
    PIN.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("PIN pattern is a valid regex"))
}

/// Checks a signup form and returns the trimmed `(name, age, pin)` on success.
///
/// All violations are collected, in a fixed order: missing fields, name
/// length, age range, PIN mismatch, PIN format.
pub fn validate_signup(form: &SignupForm) -> Result<(String, u8, String), ValidationError> {
    let name = form.name.trim();
    let pin = form.pin.trim();
    let confirm_pin = form.confirm_pin.trim();
    let mut issues = Vec::new();

    if name.is_empty() {
        issues.push(ValidationIssue::MissingField("name"));
    }
    if form.age.is_none() {
        issues.push(ValidationIssue::MissingField("age"));
    }
    if pin.is_empty() {
        issues.push(ValidationIssue::MissingField("pin"));
    }
    if confirm_pin.is_empty() {
        issues.push(ValidationIssue::MissingField("confirmPin"));
    }

    if !name.is_empty() && name.chars().count() < MIN_NAME_CHARS {
        issues.push(ValidationIssue::NameTooShort);
    }
    if let Some(age) = form.age {
        if !(i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(&age) {
            issues.push(ValidationIssue::AgeOutOfRange(age));
        }
    }
    if !pin.is_empty() && !confirm_pin.is_empty() && pin != confirm_pin {
        issues.push(ValidationIssue::PinMismatch);
    }
    if !pin.is_empty() && !pin_pattern().is_match(pin) {
        issues.push(ValidationIssue::PinFormat);
    }

    match (issues.is_empty(), form.age.and_then(|age| u8::try_from(age).ok())) {
        (true, Some(age)) => Ok((name.to_string(), age, pin.to_string())),
        _ => Err(ValidationError { issues }),
    }
}

//=========================================================================================
// The Profile Store
//=========================================================================================

pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
    active: RwLock<Option<Profile>>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            active: RwLock::new(None),
        }
    }

    /// Validates the form, persists a fresh profile, and returns it.
    ///
    /// A new signup replaces any stored profile and does not log anyone in;
    /// whoever was active is logged out.
    pub async fn create_profile(&self, form: SignupForm) -> CoreResult<Profile> {
        let (name, age, pin) = validate_signup(&form)?;
        let profile = Profile {
            id: Uuid::now_v7(),
            name,
            age,
            pin,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&profile).map_err(|e| CoreError::Corrupt {
            key: storage_keys::PROFILE.to_string(),
            reason: e.to_string(),
        })?;
        self.store.put(storage_keys::PROFILE, &json).await?;
        self.logout();

        info!(profile_id = %profile.id, "Profile created");
        Ok(profile)
    }

    /// Reads the persisted profile, if any.
    pub async fn load(&self) -> CoreResult<Option<Profile>> {
        let Some(raw) = self.store.get(storage_keys::PROFILE).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CoreError::Corrupt {
                key: storage_keys::PROFILE.to_string(),
                reason: e.to_string(),
            })
    }

    /// Logs in with a case-insensitive name and an exact PIN.
    pub async fn authenticate(&self, name: &str, pin: &str) -> CoreResult<Profile> {
        let profile = self.load().await?.ok_or(AuthFailure::NoProfile)?;

        let name_matches = profile.name.to_lowercase() == name.trim().to_lowercase();
        if !name_matches || profile.pin != pin.trim() {
            warn!("Login rejected: invalid credentials");
            return Err(AuthFailure::InvalidCredentials.into());
        }

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(profile.clone());
        info!(profile_id = %profile.id, "Profile logged in");
        Ok(profile)
    }

    /// The profile currently logged in, if any.
    pub fn active(&self) -> Option<Profile> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the active profile. The persisted profile is kept.
    pub fn logout(&self) -> Option<Profile> {
        self.active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
