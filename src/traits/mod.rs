//! Trait definitions for mockable dependencies.
//!
//! This module defines:
//! - [`CompletionClient`]: text-completion collaborator abstraction
//!
//! It also re-exports shared types from the `types` submodule.
//!
//! # Mocking
//!
//! The trait is annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates a mock implementation automatically for testing.
//!
//! # Example
//!
//! ```
//! use agency_eval::traits::{CompletionConfig, Message};
//!
//! let messages = vec![Message::user("Label this")];
//! let config = CompletionConfig::new().with_temperature(0.2);
//! assert_eq!(messages[0].role, "user");
//! assert_eq!(config.temperature, Some(0.2));
//! ```

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Usage};

use async_trait::async_trait;

use crate::error::AnthropicError;

/// Text-completion collaborator trait for mocking.
///
/// This trait abstracts the hosted LLM client so the classifier service can
/// be tested with mock implementations and run with no client at all
/// (local-only mode).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a completion request to the collaborator.
    ///
    /// # Arguments
    ///
    /// * `messages` - The ordered, role-tagged conversation messages
    /// * `config` - Completion configuration options
    ///
    /// # Errors
    ///
    /// Returns [`AnthropicError`] if the call fails for any reason; the
    /// caller is expected to recover by falling back to local heuristics.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AnthropicError>;
}
