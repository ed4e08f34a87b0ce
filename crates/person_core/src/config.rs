//! Environment configuration for the person store.
//!
//! # Responsibility
//! - Read the store connection string once at process startup.
//! - Parse it into a concrete store location before any connection opens.
//!
//! # Invariants
//! - A missing or malformed connection string never reaches `db::open_store`.
//! - `.env` files are honored but never override variables already set.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Connection string variable, e.g. `sqlite://./people.db` or `sqlite::memory:`.
pub const STORE_URI_ENV: &str = "PERSON_STORE_URI";
/// Optional log level override.
pub const LOG_LEVEL_ENV: &str = "PERSON_LOG_LEVEL";
/// Optional absolute log directory; file logging is off when unset.
pub const LOG_DIR_ENV: &str = "PERSON_LOG_DIR";

const MEMORY_URI: &str = "sqlite::memory:";
const FILE_URI_PREFIX: &str = "sqlite://";

/// Startup configuration failures. Fatal to every later store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is not set.
    MissingVar(&'static str),
    /// Connection string does not match a supported form.
    MalformedUri(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "environment variable `{name}` is not set"),
            Self::MalformedUri(uri) => write!(
                f,
                "malformed store uri `{uri}`; expected `{MEMORY_URI}` or `{FILE_URI_PREFIX}<path>`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

/// Parsed store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
}

impl StoreConfig {
    /// Loads `.env` (if present) and reads `PERSON_STORE_URI`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the connection string through `lookup` instead of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(STORE_URI_ENV).ok_or(ConfigError::MissingVar(STORE_URI_ENV))?;
        Self::from_uri(&uri)
    }

    /// Parses `sqlite::memory:` or `sqlite://<path>`.
    pub fn from_uri(uri: &str) -> Result<Self, ConfigError> {
        let trimmed = uri.trim();
        if trimmed == MEMORY_URI {
            return Ok(Self {
                location: StoreLocation::Memory,
            });
        }

        match trimmed.strip_prefix(FILE_URI_PREFIX) {
            Some(path) if !path.trim().is_empty() => Ok(Self {
                location: StoreLocation::File(PathBuf::from(path)),
            }),
            _ => Err(ConfigError::MalformedUri(trimmed.to_string())),
        }
    }
}

/// Logging settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            level: lookup(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: lookup(LOG_DIR_ENV).filter(|dir| !dir.trim().is_empty()),
        }
    }
}
