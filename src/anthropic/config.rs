//! Anthropic client configuration.
//!
//! This module provides client configuration with defaults. There are no
//! retry knobs: the evaluation paths make a single attempt and fall back to
//! local heuristics on failure.

use serde::{Deserialize, Serialize};

/// Default base URL for Anthropic API.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
/// Default timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Default max tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Client configuration for the Anthropic API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
