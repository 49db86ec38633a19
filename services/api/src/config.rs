//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use storyland_core::DEFAULT_STARS_PER_STORY;
use tracing::Level;

/// Upper bound for `STARS_PER_STORY`.
pub const MAX_STARS_PER_STORY: u32 = 100;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which remote service answers translation cache misses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslationBackend {
    MyMemory,
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub static_dir: PathBuf,
    pub translation_backend: TranslationBackend,
    pub translation_api_url: String,
    pub translation_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub translation_model: String,
    pub stars_per_story: u32,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_url: "sqlite://storyland.db?mode=rwc".to_string(),
            log_level: Level::INFO,
            static_dir: PathBuf::from("./public"),
            translation_backend: TranslationBackend::MyMemory,
            translation_api_url: "https://api.mymemory.translated.net/get".to_string(),
            translation_timeout: Duration::from_secs(10),
            openai_api_key: None,
            translation_model: "gpt-4o-mini".to_string(),
            stars_per_story: DEFAULT_STARS_PER_STORY,
            cors_origin: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        // --- Server and Storage Settings ---
        let bind_address = match var("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let database_url = var("DATABASE_URL").unwrap_or(defaults.database_url);

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let static_dir = var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        // --- Translation Settings ---
        let translation_backend = match var("TRANSLATION_BACKEND").as_deref() {
            None | Some("mymemory") => TranslationBackend::MyMemory,
            Some("openai") => TranslationBackend::OpenAi,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "TRANSLATION_BACKEND".to_string(),
                    format!("'{}' is not one of: mymemory, openai", other),
                ))
            }
        };
        let translation_api_url =
            var("TRANSLATION_API_URL").unwrap_or(defaults.translation_api_url);
        let translation_timeout = match var("TRANSLATION_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("TRANSLATION_TIMEOUT_SECS".to_string(), e.to_string())
            })?),
            None => defaults.translation_timeout,
        };

        let openai_api_key = var("OPENAI_API_KEY");
        if translation_backend == TranslationBackend::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY".to_string()));
        }
        let translation_model = var("TRANSLATION_MODEL").unwrap_or(defaults.translation_model);

        // --- Reward and Browser Settings ---
        let stars_per_story = match var("STARS_PER_STORY") {
            Some(raw) => {
                let stars = raw.parse::<u32>().map_err(|e| {
                    ConfigError::InvalidValue("STARS_PER_STORY".to_string(), e.to_string())
                })?;
                if !(1..=MAX_STARS_PER_STORY).contains(&stars) {
                    return Err(ConfigError::InvalidValue(
                        "STARS_PER_STORY".to_string(),
                        format!("{} is not between 1 and {}", stars, MAX_STARS_PER_STORY),
                    ));
                }
                stars
            }
            None => defaults.stars_per_story,
        };
        let cors_origin = var("CORS_ORIGIN");

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            static_dir,
            translation_backend,
            translation_api_url,
            translation_timeout,
            openai_api_key,
            translation_model,
            stars_per_story,
            cors_origin,
        })
    }
}
