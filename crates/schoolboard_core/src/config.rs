//! Runtime configuration for opening the record store.
//!
//! # Responsibility
//! - Resolve the database location, snapshot recovery policy and logging
//!   settings from defaults and `SCHOOLBOARD_*` environment variables.
//!
//! # Invariants
//! - Blank environment values behave as if unset.
//! - Unknown recovery values are rejected, never silently defaulted.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SCHOOLBOARD_DB_PATH";
pub const ENV_RECOVERY: &str = "SCHOOLBOARD_RECOVERY";
pub const ENV_LOG_LEVEL: &str = "SCHOOLBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SCHOOLBOARD_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "schoolboard.sqlite3";

/// What to do when a stored collection snapshot exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotRecovery {
    /// Log a warning, seed that collection, and rewrite it on next persist.
    #[default]
    FallbackToSeed,
    /// Refuse to open the store.
    Fail,
}

impl SnapshotRecovery {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FallbackToSeed => "seed",
            Self::Fail => "fail",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "seed" | "fallback" => Ok(Self::FallbackToSeed),
            "fail" | "strict" => Ok(Self::Fail),
            other => Err(ConfigError::InvalidRecovery(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidRecovery(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecovery(value) => write!(
                f,
                "unsupported snapshot recovery `{value}`; expected seed|fail"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file holding the three collection blobs.
    pub db_path: PathBuf,
    pub recovery: SnapshotRecovery,
    /// One of `trace|debug|info|warn|error`; validated by `init_logging`.
    pub log_level: String,
    /// Log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            recovery: SnapshotRecovery::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(recovery) = read(ENV_RECOVERY) {
            config.recovery = SnapshotRecovery::parse(&recovery)?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }
}
