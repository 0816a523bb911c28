//! Anthropic API client.
//!
//! This module provides:
//! - Direct Claude Messages API integration
//! - Request validation with size limits
//! - Status-code to error mapping
//!
//! # Architecture
//!
//! The client uses `reqwest` for HTTP and makes a single attempt per
//! request. There is deliberately no retry loop: callers recover by falling
//! back to the local rule-based classifier, so the fastest useful reaction
//! to a failed call is to report it.

mod client;
mod config;
mod types;

pub use client::{AnthropicClient, MAX_CONTENT_LENGTH, MAX_MESSAGES};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS,
};
pub use types::{
    ApiErrorBody, ApiErrorDetails, ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock,
};
