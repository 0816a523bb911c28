//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use agency_eval::config::{Config, SecretString, DEFAULT_MODEL};
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     api_key: Some(SecretString::new("sk-ant-example-key")),
//!     log_level: "info".to_string(),
//!     request_timeout_ms: 10_000,
//!     model: DEFAULT_MODEL.to_string(),
//!     speaker_prefix: "Teacher:".to_string(),
//! };
//!
//! // API key is protected from accidental logging
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use crate::error::ConfigError;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default speaker prefix for transcript extraction.
pub const DEFAULT_SPEAKER_PREFIX: &str = "Teacher:";

/// Application configuration.
///
/// This struct holds all configuration values for the evaluation toolkit.
/// Use [`Config::from_env`] to load configuration from environment
/// variables.
///
/// The `api_key` field is optional: without it the classifier runs
/// local-only, which is a fully supported mode because both evaluation
/// pipelines are deterministic and need no credentials. When present it
/// uses [`SecretString`] to prevent accidental logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Anthropic API key (protected from logging via [`SecretString`]);
    /// `None` selects local-only classification.
    pub api_key: Option<SecretString>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Request timeout in milliseconds for the classification call.
    pub request_timeout_ms: u64,
    /// Anthropic model to use.
    pub model: String,
    /// Speaker prefix identifying the transcript lines to classify.
    pub speaker_prefix: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `ANTHROPIC_API_KEY`: Anthropic API key (absent → local-only mode)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `REQUEST_TIMEOUT_MS`: Classification request timeout (default: `10000`)
    /// - `ANTHROPIC_MODEL`: Model to use (default: `claude-sonnet-4-20250514`)
    /// - `SPEAKER_PREFIX`: Transcript speaker prefix (default: `Teacher:`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `REQUEST_TIMEOUT_MS` is not a valid positive integer
    /// - Any value fails validation (see [`validate_config`])
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("ANTHROPIC_API_KEY").ok().map(SecretString::new);

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let request_timeout_ms = parse_env_u64("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let speaker_prefix =
            std::env::var("SPEAKER_PREFIX").unwrap_or_else(|_| DEFAULT_SPEAKER_PREFIX.into());

        let config = Self {
            api_key,
            log_level,
            request_timeout_ms,
            model,
            speaker_prefix,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: format!("must be a positive integer, got {value:?}"),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "ANTHROPIC_API_KEY",
            "LOG_LEVEL",
            "REQUEST_TIMEOUT_MS",
            "ANTHROPIC_MODEL",
            "SPEAKER_PREFIX",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_without_api_key() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.speaker_prefix, DEFAULT_SPEAKER_PREFIX);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_api_key() {
        clear_env();
        std::env::set_var("ANTHROPIC_API_KEY", "sk-ant-test");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_key.unwrap().expose(), "sk-ant-test");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var("REQUEST_TIMEOUT_MS", "20000");
        std::env::set_var("ANTHROPIC_MODEL", "claude-test-model");
        std::env::set_var("SPEAKER_PREFIX", "Coach:");
        let config = Config::from_env().unwrap();
        assert_eq!(config.request_timeout_ms, 20_000);
        assert_eq!(config.model, "claude-test-model");
        assert_eq!(config.speaker_prefix, "Coach:");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout_is_error() {
        clear_env();
        std::env::set_var("REQUEST_TIMEOUT_MS", "not-a-number");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == "REQUEST_TIMEOUT_MS"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_out_of_range_timeout_is_error() {
        clear_env();
        std::env::set_var("REQUEST_TIMEOUT_MS", "50");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == "REQUEST_TIMEOUT_MS"));
        clear_env();
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = Config {
            api_key: Some(SecretString::new("sk-ant-real-key")),
            log_level: "info".to_string(),
            request_timeout_ms: 10_000,
            model: DEFAULT_MODEL.to_string(),
            speaker_prefix: DEFAULT_SPEAKER_PREFIX.to_string(),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("<REDACTED>"));
        assert!(!debug.contains("sk-ant-real-key"));
    }
}
