//! Best-effort classification service.
//!
//! [`AgencyClassifier`] fronts the rule-based classifier with an optional
//! LLM-backed path: one timeout-bounded request to the collaborator, then a
//! transparent fallback to the local rules on any failure. Callers get the
//! same [`TranscriptReport`] shape either way; only the optional confidence
//! scores (and the logs) reveal which path produced it.

use std::sync::Arc;
use std::time::Duration;

use crate::anthropic::{AnthropicClient, ClientConfig, DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT_MS};
use crate::config::Config;
use crate::error::{AnthropicError, AppError, ClassifyError};
use crate::prompts::{agency_system_prompt, agency_user_prompt};
use crate::traits::{CompletionClient, CompletionConfig, Message};

use super::parsing::{extract_json, parse_labels};
use super::rules::{classify_utterance, extract_utterances, report_from_predictions};
use super::types::{AgencyLabel, LinePrediction, TranscriptReport};

/// Sampling temperature for the classification call. Low because the task
/// asks for labels, not prose.
const CLASSIFY_TEMPERATURE: f32 = 0.2;

/// Outcome of the single remote attempt.
enum RemoteOutcome {
    /// One `(label, confidence)` pair per utterance, in order.
    Labeled(Vec<(AgencyLabel, f64)>),
    /// The request did not complete within the service timeout.
    TimedOut,
    /// The request failed or returned an unusable payload.
    Failed(AppError),
}

/// Transcript classifier with best-effort LLM refinement.
///
/// Generic over [`CompletionClient`] so tests can substitute mocks; the
/// production type is [`AgencyClassifier<Arc<AnthropicClient>>`], most
/// easily built via [`AgencyClassifier::from_config`].
#[derive(Debug)]
pub struct AgencyClassifier<C> {
    client: Option<C>,
    model: Option<String>,
    timeout: Duration,
}

impl<C: CompletionClient> AgencyClassifier<C> {
    /// Create a classifier that tries the given collaborator first.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client: Some(client),
            model: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Override the model identifier sent with the request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the remote-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Classify a transcript, preferring the collaborator when available.
    ///
    /// The extraction and no-utterance check run locally before any remote
    /// call; a transcript with no matching lines never costs a request.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::NoUtterances`] when no line matches the
    /// speaker prefix. Remote failures are not errors from the caller's
    /// perspective: they are logged and resolved via the rule-based path.
    pub async fn classify(
        &self,
        transcript: &str,
        speaker_prefix: &str,
    ) -> Result<TranscriptReport, ClassifyError> {
        let utterances = extract_utterances(transcript, speaker_prefix);
        if utterances.is_empty() {
            return Err(ClassifyError::NoUtterances {
                speaker_prefix: speaker_prefix.to_string(),
            });
        }

        if let Some(client) = &self.client {
            match self.remote_outcome(client, &utterances).await {
                RemoteOutcome::Labeled(pairs) => {
                    tracing::debug!(utterances = utterances.len(), "remote classification used");
                    let predictions = utterances
                        .into_iter()
                        .zip(pairs)
                        .map(|(text, (label, confidence))| {
                            LinePrediction::with_confidence(text, label, confidence)
                        })
                        .collect();
                    return Ok(report_from_predictions(predictions));
                }
                RemoteOutcome::TimedOut => {
                    tracing::warn!(
                        timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                        "classification request timed out, using rule-based labels"
                    );
                }
                RemoteOutcome::Failed(err) => match &err {
                    AppError::Anthropic(e) if !e.is_transient() => {
                        tracing::error!(error = %err, "classification request rejected, using rule-based labels");
                    }
                    _ => {
                        tracing::warn!(error = %err, "classification request failed, using rule-based labels");
                    }
                },
            }
        }

        let predictions = utterances
            .into_iter()
            .map(|text| {
                let label = classify_utterance(&text);
                LinePrediction::new(text, label)
            })
            .collect();
        Ok(report_from_predictions(predictions))
    }

    /// Make the single remote attempt and fold every failure mode into a
    /// tagged outcome.
    async fn remote_outcome(&self, client: &C, utterances: &[String]) -> RemoteOutcome {
        let mut config = CompletionConfig::new()
            .with_max_tokens(DEFAULT_MAX_TOKENS)
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_system_prompt(agency_system_prompt());
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        let messages = vec![Message::user(agency_user_prompt(utterances))];

        match tokio::time::timeout(self.timeout, client.complete(messages, config)).await {
            Err(_) => RemoteOutcome::TimedOut,
            Ok(Err(e)) => RemoteOutcome::Failed(e.into()),
            Ok(Ok(response)) => {
                match extract_json(&response.content)
                    .and_then(|json| parse_labels(&json, utterances.len()))
                {
                    Ok(pairs) => RemoteOutcome::Labeled(pairs),
                    Err(e) => RemoteOutcome::Failed(e.into()),
                }
            }
        }
    }
}

impl AgencyClassifier<Arc<AnthropicClient>> {
    /// Create a classifier with no collaborator: every call takes the
    /// rule-based path directly.
    #[must_use]
    pub fn local_only() -> Self {
        Self {
            client: None,
            model: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Build the production classifier from application configuration.
    ///
    /// With no API key configured this degrades to [`Self::local_only`];
    /// the deterministic cores never require credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AnthropicError`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, AnthropicError> {
        let Some(api_key) = config.api_key.as_ref() else {
            tracing::info!("no API key configured, classification runs local-only");
            return Ok(Self::local_only());
        };

        let client_config = ClientConfig::default().with_timeout_ms(config.request_timeout_ms);
        let client = AnthropicClient::new(api_key.expose(), client_config)?;

        Ok(Self {
            client: Some(Arc::new(client)),
            model: Some(config.model.clone()),
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }
}
