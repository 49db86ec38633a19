//! crates/storyland_core/src/error.rs
//!
//! The error taxonomy of the core components. Translation failures are not
//! listed here: the translation cache always recovers from them.

use crate::domain::StoryId;
use crate::ports::PortError;

/// One violated signup rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("name must be at least 2 characters long")]
    NameTooShort,
    #[error("age must be between 4 and 10 (got {0})")]
    AgeOutOfRange(i64),
    #[error("PINs do not match")]
    PinMismatch,
    #[error("PIN must be exactly 4 digits")]
    PinFormat,
}

/// Every rule a signup form broke, in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("no profile exists on this device")]
    NoProfile,
    #[error("invalid name or PIN")]
    InvalidCredentials,
}

/// The primary error type for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid profile: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthFailure),

    #[error("Story {0} not found")]
    StoryNotFound(StoryId),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),

    /// A persisted record exists but cannot be decoded.
    #[error("Corrupt record under '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
