//! Experiment simulation types.
//!
//! Parameter and result shapes for the two planning simulations:
//! - [`EngagementParams`] / [`EngagementResult`]: A/B engagement-rate test
//! - [`SelfReportParams`] / [`SelfReportResult`]: five-domain self-report
//!   test over the [`PracticeDomain`] set
//!
//! All values are plain data; the arithmetic lives in the engine module.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters for the engagement A/B simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementParams {
    /// Number of participants (positive).
    pub sample_size: u32,
    /// Experiment duration in weeks (positive).
    pub duration_weeks: u32,
    /// Baseline engagement rate as a percentage in `[0,100]`.
    pub baseline_rate: f64,
    /// Minimum detectable effect in percentage points (> 0).
    pub minimum_detectable_effect: f64,
    /// Display label for variant A (non-empty).
    pub variant_a_label: String,
    /// Display label for variant B (non-empty).
    pub variant_b_label: String,
}

impl EngagementParams {
    /// Create parameters with default variant labels.
    #[must_use]
    pub fn new(
        sample_size: u32,
        duration_weeks: u32,
        baseline_rate: f64,
        minimum_detectable_effect: f64,
    ) -> Self {
        Self {
            sample_size,
            duration_weeks,
            baseline_rate,
            minimum_detectable_effect,
            variant_a_label: "Variant A".to_string(),
            variant_b_label: "Variant B".to_string(),
        }
    }

    /// Set both variant display labels.
    #[must_use]
    pub fn with_variant_labels(
        mut self,
        variant_a: impl Into<String>,
        variant_b: impl Into<String>,
    ) -> Self {
        self.variant_a_label = variant_a.into();
        self.variant_b_label = variant_b.into();
        self
    }
}

/// Simulated engagement outcome. All percentages, one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementResult {
    /// Variant A engagement rate in `[0,100]`.
    pub variant_a_pct: f64,
    /// Variant B engagement rate in `[0,100]`.
    pub variant_b_pct: f64,
    /// `variant_b_pct - variant_a_pct`, may be negative.
    pub difference_pp: f64,
}

/// The five fixed practice domains measured on the 1-5 self-report scale,
/// in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PracticeDomain {
    /// Recognizing one's own emotions and values.
    SelfAwareness,
    /// Regulating emotions and behaviors.
    SelfManagement,
    /// Understanding others' perspectives.
    SocialAwareness,
    /// Building and maintaining healthy relationships.
    RelationshipSkills,
    /// Making caring, constructive choices.
    ResponsibleDecisionMaking,
}

impl PracticeDomain {
    /// All domains in canonical order.
    pub const ALL: [Self; 5] = [
        Self::SelfAwareness,
        Self::SelfManagement,
        Self::SocialAwareness,
        Self::RelationshipSkills,
        Self::ResponsibleDecisionMaking,
    ];

    /// The external string form of the domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfAwareness => "self-awareness",
            Self::SelfManagement => "self-management",
            Self::SocialAwareness => "social-awareness",
            Self::RelationshipSkills => "relationship-skills",
            Self::ResponsibleDecisionMaking => "responsible-decision-making",
        }
    }

    /// Position of the domain in canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PracticeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-domain input: baseline score and emphasis flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainParams {
    /// Baseline self-report score in `[1,5]`.
    pub baseline: f64,
    /// Whether this domain is emphasized in the intervention.
    pub emphasize: bool,
}

impl DomainParams {
    /// Create per-domain parameters.
    #[must_use]
    pub const fn new(baseline: f64, emphasize: bool) -> Self {
        Self {
            baseline,
            emphasize,
        }
    }
}

/// Parameters for the self-report simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfReportParams {
    /// Number of participants (positive).
    pub sample_size: u32,
    /// Experiment duration in weeks (positive).
    pub duration_weeks: u32,
    /// Per-domain inputs, indexed by [`PracticeDomain::ALL`] order.
    pub domains: [DomainParams; 5],
}

impl SelfReportParams {
    /// Create parameters with explicit per-domain inputs.
    #[must_use]
    pub const fn new(sample_size: u32, duration_weeks: u32, domains: [DomainParams; 5]) -> Self {
        Self {
            sample_size,
            duration_weeks,
            domains,
        }
    }

    /// Create parameters with the same unemphasized baseline in every domain.
    #[must_use]
    pub fn uniform(sample_size: u32, duration_weeks: u32, baseline: f64) -> Self {
        Self::new(
            sample_size,
            duration_weeks,
            [DomainParams::new(baseline, false); 5],
        )
    }

    /// Mark one domain as emphasized.
    #[must_use]
    pub fn emphasize(mut self, domain: PracticeDomain) -> Self {
        self.domains[domain.index()].emphasize = true;
        self
    }

    /// Per-domain input for one domain.
    #[must_use]
    pub fn domain(&self, domain: PracticeDomain) -> &DomainParams {
        &self.domains[domain.index()]
    }
}

/// Simulated (baseline, score) pair for one domain. Two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainOutcome {
    /// The domain measured.
    pub domain: PracticeDomain,
    /// Baseline score echoed from the input, in `[1,5]`.
    pub baseline: f64,
    /// Simulated post-intervention score, clamped to `[1,5]`.
    pub simulated: f64,
}

/// Simulated self-report outcome across all five domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfReportResult {
    /// One outcome per domain, in canonical order.
    pub domains: [DomainOutcome; 5],
    /// Mean of `simulated - baseline` across domains, two decimal places.
    pub mean_change: f64,
}

impl SelfReportResult {
    /// Outcome for one domain.
    #[must_use]
    pub fn outcome(&self, domain: PracticeDomain) -> &DomainOutcome {
        &self.domains[domain.index()]
    }
}
