//! Transcript classification types.
//!
//! This module defines the classification vocabulary:
//! - [`AgencyLabel`]: the closed three-way agency category
//! - [`LinePrediction`]: one labeled utterance
//! - [`LabelStats`] and [`AggregateResult`]: per-label distribution
//! - [`TranscriptReport`]: the complete result handed to callers
//!
//! Every type serializes so the presentation layer can consume results as
//! JSON. All values are created fresh per classification call; there is no
//! identity beyond structural equality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Three-way agency category for a single utterance.
///
/// The category set is closed: exhaustive matching prevents a typo from
/// silently creating a fourth label. The autonomous-agency variant is named
/// `SelfDirected` because `Self` is reserved in Rust; it serializes and
/// displays as `"self"` to keep the external label vocabulary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgencyLabel {
    /// Autonomous decision-making and ownership language (serialized as `self`).
    #[serde(rename = "self")]
    SelfDirected,
    /// Deference, uncertainty, or passive acceptance of a suggestion.
    Proxy,
    /// Collaborative or plural framing of the work.
    Collective,
}

impl AgencyLabel {
    /// All labels in canonical order: self, proxy, collective.
    pub const ALL: [Self; 3] = [Self::SelfDirected, Self::Proxy, Self::Collective];

    /// The external string form of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfDirected => "self",
            Self::Proxy => "proxy",
            Self::Collective => "collective",
        }
    }
}

impl fmt::Display for AgencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown label string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    /// The string that did not match any label.
    pub unknown: String,
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown agency label {:?}, expected self, proxy, or collective",
            self.unknown
        )
    }
}

impl std::error::Error for ParseLabelError {}

impl FromStr for AgencyLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "self" => Ok(Self::SelfDirected),
            "proxy" => Ok(Self::Proxy),
            "collective" => Ok(Self::Collective),
            other => Err(ParseLabelError {
                unknown: other.to_string(),
            }),
        }
    }
}

/// Resolve the label with the strictly highest count.
///
/// Counts are indexed by [`AgencyLabel::ALL`] order. Any tie at the top,
/// including the all-zero case, resolves to `SelfDirected`; this reproduces
/// the reference fallback exactly.
#[must_use]
pub(crate) fn top_label(counts: [usize; 3]) -> AgencyLabel {
    let max = counts[0].max(counts[1]).max(counts[2]);
    let at_max = counts.iter().filter(|&&c| c == max).count();
    if at_max > 1 {
        return AgencyLabel::SelfDirected;
    }
    // Exactly one label holds the max; position 0 is SelfDirected.
    AgencyLabel::ALL[counts.iter().position(|&c| c == max).unwrap_or(0)]
}

/// One classified utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePrediction {
    /// The utterance text (speaker prefix removed, trimmed).
    pub text: String,
    /// The assigned agency label.
    pub label: AgencyLabel,
    /// Classifier confidence in `[0,1]`; present only on the LLM path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl LinePrediction {
    /// Create a prediction without a confidence score (rule-based path).
    #[must_use]
    pub fn new(text: impl Into<String>, label: AgencyLabel) -> Self {
        Self {
            text: text.into(),
            label,
            confidence: None,
        }
    }

    /// Create a prediction with a confidence score (LLM path).
    #[must_use]
    pub fn with_confidence(text: impl Into<String>, label: AgencyLabel, confidence: f64) -> Self {
        Self {
            text: text.into(),
            label,
            confidence: Some(confidence),
        }
    }
}

/// Per-label distribution statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LabelStats {
    /// Number of utterances assigned this label.
    pub count: usize,
    /// `count / total`; `0.0` when the total is zero.
    pub share: f64,
    /// Mean confidence over this label's predictions; present only when the
    /// predictions carry confidence scores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_confidence: Option<f64>,
}

/// Aggregate distribution over the three labels.
///
/// Invariant: when `total > 0` the three shares sum to `1.0` within
/// floating-point tolerance, because every utterance receives exactly one
/// label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Total number of classified utterances.
    pub total: usize,
    /// Statistics for the `self` label.
    #[serde(rename = "self")]
    pub self_directed: LabelStats,
    /// Statistics for the `proxy` label.
    pub proxy: LabelStats,
    /// Statistics for the `collective` label.
    pub collective: LabelStats,
}

impl AggregateResult {
    /// Compute the aggregate for a prediction sequence.
    ///
    /// Mean confidences are computed per label over the predictions that
    /// carry a score; a label with no scored predictions reports `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_predictions(predictions: &[LinePrediction]) -> Self {
        let total = predictions.len();
        let stats_for = |label: AgencyLabel| {
            let count = predictions.iter().filter(|p| p.label == label).count();
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            let scores: Vec<f64> = predictions
                .iter()
                .filter(|p| p.label == label)
                .filter_map(|p| p.confidence)
                .collect();
            let mean_confidence = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };
            LabelStats {
                count,
                share,
                mean_confidence,
            }
        };

        Self {
            total,
            self_directed: stats_for(AgencyLabel::SelfDirected),
            proxy: stats_for(AgencyLabel::Proxy),
            collective: stats_for(AgencyLabel::Collective),
        }
    }

    /// Statistics for one label.
    #[must_use]
    pub const fn stats(&self, label: AgencyLabel) -> &LabelStats {
        match label {
            AgencyLabel::SelfDirected => &self.self_directed,
            AgencyLabel::Proxy => &self.proxy,
            AgencyLabel::Collective => &self.collective,
        }
    }

    /// The label with the highest share; ties prefer `SelfDirected`, the
    /// same rule the per-utterance classifier applies.
    #[must_use]
    pub fn dominant(&self) -> AgencyLabel {
        top_label([
            self.self_directed.count,
            self.proxy.count,
            self.collective.count,
        ])
    }
}

/// Complete classification result for one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptReport {
    /// Per-line predictions in transcript order.
    pub predictions: Vec<LinePrediction>,
    /// Aggregate counts, shares, and optional mean confidences.
    pub aggregate: AggregateResult,
    /// Plain-language summary. Derived, non-authoritative view of
    /// `aggregate`; assert on the aggregate in tests, not on this string.
    pub summary: String,
}
