//! Error types for the agency evaluation toolkit.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`AnthropicError`]: Anthropic API specific errors
//! - [`ClassifyError`]: Transcript classification errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility. The simulator
//! has no error type of its own: its operations are total functions.

use thiserror::Error;

/// Top-level application error.
///
/// This is the main error type returned by public API functions.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Anthropic API error.
    #[error("Anthropic API error: {0}")]
    Anthropic(#[from] AnthropicError),

    /// Classification error.
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Anthropic API errors.
///
/// These errors represent failures when communicating with the Anthropic API.
/// Every variant is recoverable from the classifier's point of view: the
/// service layer logs it and falls back to the local rule-based path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The requested model is overloaded.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// The model that is overloaded.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl AnthropicError {
    /// Returns true if this error is service weather rather than a caller bug.
    ///
    /// Only `InvalidRequest` indicates a malformed request on our side; it is
    /// logged at error level where transient conditions log at warn. Both
    /// classes still resolve to the local fallback in the classifier service.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidRequest { .. })
    }
}

/// Transcript classification errors.
///
/// `NoUtterances` is the structured "no data" result required by the
/// classification contract; the remaining variants describe malformed
/// payloads from the LLM-backed path and never escape the service layer
/// (they trigger the local fallback instead).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// No line in the transcript matched the target speaker prefix.
    #[error("No utterances found for speaker prefix {speaker_prefix:?}")]
    NoUtterances {
        /// The prefix that matched nothing.
        speaker_prefix: String,
    },

    /// Missing required field in the LLM response payload.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Invalid value for a field in the LLM response payload.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// JSON parsing failed.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Description of the parsing error.
        message: String,
    },

    /// The LLM returned a different number of labels than utterances sent.
    #[error("Label count mismatch: expected {expected}, got {actual}")]
    LabelCountMismatch {
        /// Number of utterances sent.
        expected: usize,
        /// Number of labels returned.
        actual: usize,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
