//! Status synchronization configuration
//!
//! Layered the usual way: built-in defaults, then an optional TOML file, then
//! `BANQUE_SYNC_*` environment variables, then validation.
//!
//! ```toml
//! background_refresh = true
//! refresh_min_interval_ms = 30000
//! correct_email_verified = true
//! normalize_legacy_status = false
//! ```

mod env;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use env::ENV_PREFIX;

/// Longest accepted background refresh throttle (one day).
pub const MAX_REFRESH_INTERVAL_MS: u64 = 86_400_000;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file: {0}")]
    Io(String),

    /// The file or an override did not parse
    #[error("invalid config: {0}")]
    Parse(String),

    /// A value is out of range
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// Offending key
        key: String,
        /// What is wrong with it
        message: String,
    },
}

/// Behavior switches for the status syncer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Refresh in the background when a cached snapshot is served
    pub background_refresh: bool,

    /// Minimum time between background refreshes of one session
    pub refresh_min_interval_ms: u64,

    /// Write the provider's email verification flag back over a stale stored copy
    pub correct_email_verified: bool,

    /// Rewrite disagreeing legacy status fields to the canonical value on force sync
    pub normalize_legacy_status: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            background_refresh: true,
            refresh_min_interval_ms: 0,
            correct_email_verified: true,
            normalize_legacy_status: false,
        }
    }
}

impl SyncConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Apply `BANQUE_SYNC_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_from_vars(std::env::vars())
    }

    /// Apply `BANQUE_SYNC_*` overrides from an explicit variable list.
    pub fn merge_from_vars<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            if let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) {
                self.set_from_string(&name.to_ascii_lowercase(), value.as_ref())?;
            }
        }
        Ok(())
    }

    /// Set one key from its string form.
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "background_refresh" => self.background_refresh = env::parse_bool(key, value)?,
            "refresh_min_interval_ms" => {
                self.refresh_min_interval_ms = env::parse_u64(key, value)?;
            }
            "correct_email_verified" => {
                self.correct_email_verified = env::parse_bool(key, value)?;
            }
            "normalize_legacy_status" => {
                self.normalize_legacy_status = env::parse_bool(key, value)?;
            }
            _ => {
                tracing::debug!(key, "ignoring unknown sync config key");
            }
        }
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_min_interval_ms > MAX_REFRESH_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                key: "refresh_min_interval_ms".to_string(),
                message: format!("must not exceed {MAX_REFRESH_INTERVAL_MS}"),
            });
        }
        Ok(())
    }

    /// Defaults, then the optional file, then the environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}
