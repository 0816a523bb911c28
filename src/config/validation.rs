//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `ANTHROPIC_API_KEY`, when present, must not be empty
/// - `REQUEST_TIMEOUT_MS` must be between 1000 and 300000
/// - `SPEAKER_PREFIX` must not be empty or whitespace
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // An absent key means local-only mode; a present-but-empty key is a
    // configuration mistake worth surfacing.
    if let Some(api_key) = &config.api_key {
        if api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "ANTHROPIC_API_KEY".into(),
                reason: "must not be empty when set".into(),
            });
        }
    }

    // Timeout must be reasonable (1s to 5m)
    if config.request_timeout_ms < MIN_TIMEOUT_MS || config.request_timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::InvalidValue {
            var: "REQUEST_TIMEOUT_MS".into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        });
    }

    if config.speaker_prefix.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "SPEAKER_PREFIX".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(())
}
