//! Anthropic API client.
//!
//! This module provides:
//! - HTTP client for the Anthropic Messages API
//! - Request validation
//! - Response parsing
//!
//! The client makes exactly one attempt per request. Recovery from failures
//! belongs to the classifier service, which falls back to the local
//! rule-based path; a retry loop here would only delay that fallback.

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::config::{ClientConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use super::types::{ApiMessage, ApiRequest, ApiResponse, ContentBlock};
use crate::error::AnthropicError;
use crate::traits::{CompletionClient, CompletionConfig, CompletionResponse, Message, Usage};

/// Maximum number of messages per request.
pub const MAX_MESSAGES: usize = 50;
/// Maximum content length per message (50KB).
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, AnthropicError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client =
            Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| AnthropicError::Network {
                    message: format!("Failed to create HTTP client: {e}"),
                })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a client with default configuration.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, AnthropicError> {
        Self::new(api_key, ClientConfig::default())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a completion request. Single attempt, no retries.
    pub async fn complete_raw(&self, request: ApiRequest) -> Result<String, AnthropicError> {
        Self::validate_request(&request)?;
        let response = self.execute(&request).await?;
        Self::collect_text(&response)
    }

    /// Validate request size limits.
    fn validate_request(request: &ApiRequest) -> Result<(), AnthropicError> {
        if request.messages.len() > MAX_MESSAGES {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Too many messages: {} > {}",
                    request.messages.len(),
                    MAX_MESSAGES
                ),
            });
        }

        for msg in &request.messages {
            if msg.len() > MAX_CONTENT_LENGTH {
                return Err(AnthropicError::InvalidRequest {
                    message: format!("Message too large: {} > {}", msg.len(), MAX_CONTENT_LENGTH),
                });
            }
        }

        Ok(())
    }

    /// Execute the request.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, AnthropicError> {
        let url = format!("{}/messages", self.config.base_url);
        let start = std::time::Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            timeout_ms = self.config.timeout_ms,
            "Starting Anthropic API request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if e.is_timeout() {
                    tracing::warn!(
                        url = %url,
                        elapsed_ms,
                        timeout_ms = self.config.timeout_ms,
                        "Anthropic API request timed out"
                    );
                    AnthropicError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    tracing::warn!(
                        url = %url,
                        elapsed_ms,
                        error = %e,
                        "Anthropic API request failed"
                    );
                    AnthropicError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            url = %url,
            status = %status,
            "Anthropic API response received"
        );

        if status.as_u16() == 401 {
            return Err(AnthropicError::AuthenticationFailed);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(AnthropicError::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        if status.as_u16() == 529 {
            return Err(AnthropicError::ModelOverloaded {
                model: request.model.clone(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnthropicError::UnexpectedResponse {
                message: format!("Status {status}: {body}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AnthropicError::UnexpectedResponse {
                message: format!("Failed to parse response: {e}"),
            })
    }

    /// Collect text blocks into a single string.
    fn collect_text(response: &ApiResponse) -> Result<String, AnthropicError> {
        let mut raw_text = String::new();
        for block in &response.content {
            let ContentBlock::Text { text } = block;
            if !raw_text.is_empty() {
                raw_text.push('\n');
            }
            raw_text.push_str(text);
        }

        if raw_text.is_empty() {
            return Err(AnthropicError::UnexpectedResponse {
                message: "No content in response".to_string(),
            });
        }

        Ok(raw_text)
    }
}

// ============================================================================
// CompletionClient implementations
// ============================================================================

/// Convert trait types to API types and call the underlying client.
#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AnthropicError> {
        // System messages fold into the request's system field; the Messages
        // API only accepts user/assistant roles in the message list.
        let mut system_parts: Vec<String> = Vec::new();
        let mut api_messages: Vec<ApiMessage> = Vec::new();
        for m in messages {
            match m.role.as_str() {
                "system" => system_parts.push(m.content),
                "assistant" => api_messages.push(ApiMessage::assistant(m.content)),
                _ => api_messages.push(ApiMessage::user(m.content)),
            }
        }

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let max_tokens = config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let mut request = ApiRequest::new(model, max_tokens, api_messages);

        if let Some(temp) = config.temperature {
            request = request.with_temperature(f64::from(temp));
        }

        if let Some(system) = config.system_prompt {
            system_parts.insert(0, system);
        }
        if !system_parts.is_empty() {
            request = request.with_system(system_parts.join("\n\n"));
        }

        Self::validate_request(&request)?;
        let response = self.execute(&request).await?;
        let text = Self::collect_text(&response)?;

        Ok(CompletionResponse::new(
            text,
            Usage::new(response.usage.input_tokens, response.usage.output_tokens),
        ))
    }
}

/// Blanket implementation for `Arc<AnthropicClient>`.
#[async_trait]
impl CompletionClient for Arc<AnthropicClient> {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AnthropicError> {
        <AnthropicClient as CompletionClient>::complete(self.as_ref(), messages, config).await
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unused_async
)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Helper to create a mock client pointing to the mock server
    async fn create_mock_client(server: &MockServer) -> AnthropicClient {
        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_timeout_ms(5_000);
        AnthropicClient::new("test-api-key", config).unwrap()
    }

    // Helper to create a valid API response body
    fn success_response_body(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_123",
            "content": [{"type": "text", "text": text}],
            "model": "claude-3",
            "usage": {"input_tokens": 10, "output_tokens": 20},
            "stop_reason": "end_turn"
        })
    }

    // AnthropicClient creation tests
    #[test]
    fn test_client_new() {
        let client = AnthropicClient::with_api_key("test-key").unwrap();
        assert_eq!(client.base_url(), "https://api.anthropic.com/v1");
    }

    #[test]
    fn test_client_with_config() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_timeout_ms(10_000);
        let client = AnthropicClient::new("test-key", config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.config().timeout_ms, 10_000);
    }

    // Request validation tests
    #[tokio::test]
    async fn test_validate_request_too_many_messages() {
        let server = MockServer::start().await;
        let client = create_mock_client(&server).await;

        let messages: Vec<ApiMessage> = (0..=MAX_MESSAGES)
            .map(|i| ApiMessage::user(format!("Message {i}")))
            .collect();

        let request = ApiRequest::new("claude-3", 1000, messages);
        let result = client.complete_raw(request).await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, AnthropicError::InvalidRequest { .. }));
        assert!(err.to_string().contains("Too many messages"));
    }

    #[tokio::test]
    async fn test_validate_request_message_too_large() {
        let server = MockServer::start().await;
        let client = create_mock_client(&server).await;

        let large_content = "x".repeat(MAX_CONTENT_LENGTH + 1);
        let messages = vec![ApiMessage::user(large_content)];

        let request = ApiRequest::new("claude-3", 1000, messages);
        let result = client.complete_raw(request).await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, AnthropicError::InvalidRequest { .. }));
        assert!(err.to_string().contains("Message too large"));
    }

    // Successful request tests
    #[tokio::test]
    async fn test_complete_raw_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_response_body("Hello!")))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-3", 1000, vec![ApiMessage::user("Hi")]);

        let result = client.complete_raw(request).await;
        assert_eq!(result.unwrap(), "Hello!");
    }

    #[tokio::test]
    async fn test_complete_trait_maps_system_role() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_response_body("ok")))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let messages = vec![Message::system("Label utterances"), Message::user("Hi")];
        let config = CompletionConfig::new().with_temperature(0.2);

        let result = CompletionClient::complete(&client, messages, config).await;
        assert!(result.is_ok());

        let response = result.unwrap();
        assert_eq!(response.content, "ok");
        assert_eq!(response.usage.input_tokens, 10);
        assert_eq!(response.usage.output_tokens, 20);

        // The mock server saw exactly one request whose body folded the
        // system message out of the message list.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["system"], "Label utterances");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_complete_trait_via_arc() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_response_body("ok")))
            .mount(&server)
            .await;

        let client = Arc::new(create_mock_client(&server).await);
        let result = client
            .complete(vec![Message::user("Hi")], CompletionConfig::new())
            .await;
        assert!(result.is_ok());
    }

    // Error handling tests
    #[tokio::test]
    async fn test_complete_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-3", 1000, vec![ApiMessage::user("Hi")]);

        let result = client.complete_raw(request).await;
        assert!(matches!(
            result.unwrap_err(),
            AnthropicError::AuthenticationFailed
        ));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(
                ResponseTemplate::new(429)
                    .append_header("retry-after", "30")
                    .set_body_string("Rate limited"),
            )
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-3", 1000, vec![ApiMessage::user("Hi")]);

        match client.complete_raw(request).await.unwrap_err() {
            AnthropicError::RateLimited {
                retry_after_seconds,
            } => assert_eq!(retry_after_seconds, 30),
            e => panic!("Wrong error type: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_model_overloaded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("Overloaded"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-sonnet", 1000, vec![ApiMessage::user("Hi")]);

        match client.complete_raw(request).await.unwrap_err() {
            AnthropicError::ModelOverloaded { model } => assert_eq!(model, "claude-sonnet"),
            e => panic!("Wrong error type: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-3", 1000, vec![ApiMessage::user("Hi")]);

        let result = client.complete_raw(request).await;
        assert!(matches!(
            result.unwrap_err(),
            AnthropicError::UnexpectedResponse { .. }
        ));
    }

    #[tokio::test]
    async fn test_complete_empty_response() {
        let server = MockServer::start().await;

        let response_body = json!({
            "id": "msg_123",
            "content": [],
            "model": "claude-3",
            "usage": {"input_tokens": 10, "output_tokens": 0},
            "stop_reason": "end_turn"
        });

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-3", 1000, vec![ApiMessage::user("Hi")]);

        let result = client.complete_raw(request).await;
        assert!(matches!(
            result.unwrap_err(),
            AnthropicError::UnexpectedResponse { .. }
        ));
    }

    #[tokio::test]
    async fn test_single_attempt_no_retry() {
        let server = MockServer::start().await;

        // A 529 must be reported after exactly one call; the fallback layer
        // owns recovery, not this client.
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(529))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_mock_client(&server).await;
        let request = ApiRequest::new("claude-3", 1000, vec![ApiMessage::user("Hi")]);

        let result = client.complete_raw(request).await;
        assert!(matches!(
            result.unwrap_err(),
            AnthropicError::ModelOverloaded { .. }
        ));
    }

    // Client debug test
    #[test]
    fn test_client_debug() {
        let client = AnthropicClient::with_api_key("test-key").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("AnthropicClient"));
    }
}
