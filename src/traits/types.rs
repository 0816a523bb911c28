//! Shared types for the traits module.
//!
//! This module defines the request/response vocabulary for the external
//! text-completion collaborator:
//! - [`Message`]: role-tagged conversation message
//! - [`CompletionConfig`]: completion request configuration
//! - [`CompletionResponse`]: completion response
//! - [`Usage`]: token usage information (opaque to the core)

/// Message for API requests.
///
/// Represents a single message in a conversation with the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Role of the message sender (user, assistant, system).
    pub role: String,
    /// Content of the message.
    pub content: String,
}

impl Message {
    /// Create a new message.
    #[must_use]
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Completion configuration.
///
/// Configuration options for API completion requests.
#[derive(Debug, Clone, Default, PartialEq)]
// Cannot derive Eq: f32 temperature field does not implement Eq (IEEE 754 NaN != NaN)
#[allow(clippy::derive_partial_eq_without_eq)]
pub struct CompletionConfig {
    /// Model identifier override; the client default is used when absent.
    pub model: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 to 1.0).
    pub temperature: Option<f32>,
    /// System prompt to prepend.
    pub system_prompt: Option<String>,
}

impl CompletionConfig {
    /// Create a new completion config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Token usage information.
///
/// Tracks the number of tokens used in a request/response. Carried through
/// for display purposes only; no calculation in this crate consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    /// Input tokens (prompt).
    pub input_tokens: u32,
    /// Output tokens (completion).
    pub output_tokens: u32,
}

impl Usage {
    /// Create new usage info.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Completion response.
///
/// The response from an API completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Response content.
    pub content: String,
    /// Token usage.
    pub usage: Usage,
}

impl CompletionResponse {
    /// Create a new completion response.
    #[must_use]
    pub fn new(content: impl Into<String>, usage: Usage) -> Self {
        Self {
            content: content.into(),
            usage,
        }
    }
}
