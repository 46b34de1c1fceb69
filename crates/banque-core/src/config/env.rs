//! Environment override parsing

use super::ConfigError;

/// Prefix of environment variables read by [`SyncConfig::merge_with_env`](super::SyncConfig::merge_with_env).
pub const ENV_PREFIX: &str = "BANQUE_SYNC_";

pub(super) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

pub(super) fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("expected an unsigned integer, got {value:?}"),
    })
}
