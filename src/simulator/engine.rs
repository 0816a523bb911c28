//! Deterministic experiment simulation.
//!
//! Fabricates plausible "observed" outcomes from experiment parameters so a
//! planning demo reproduces the same numbers on every run. The generator is
//! the classic `frac(sin(seed) * 10000)` trick; the seed folds every input
//! field with fixed weights so that changing any field changes the outcome.
//!
//! None of this is statistical inference and it must not be presented as
//! such; the only contract is determinism, sensitivity, and output ranges.

use super::types::{
    DomainOutcome, EngagementParams, EngagementResult, PracticeDomain, SelfReportParams,
    SelfReportResult,
};

/// Half-width of the engagement perturbation around the baseline (rate units).
const ENGAGEMENT_JITTER: f64 = 0.02;
/// Span of the variant-B lift draw (rate units).
const LIFT_SPAN: f64 = 0.09;
/// Downward offset of the lift draw; makes a negative lift possible.
const LIFT_OFFSET: f64 = 0.015;
/// Half-width of the per-domain score perturbation (score units).
const SCORE_JITTER: f64 = 0.15;
/// Score bonus for an unemphasized domain.
const BASE_BONUS: f64 = 0.15;
/// Score bonus for an emphasized domain. Always exceeds [`BASE_BONUS`].
const EMPHASIS_BONUS: f64 = 0.45;

/// Deterministic pseudo-random value in `[0,1)` for a seed.
///
/// Uses the Euclidean fractional part so negative seeds still land in
/// `[0,1)`. Pure and stateless: identical seeds yield identical values
/// across calls and process restarts.
#[must_use]
pub fn seeded_random(seed: f64) -> f64 {
    let v = seed.sin() * 10_000.0;
    let frac = v - v.floor();
    // v - v.floor() can round up to exactly 1.0 when v sits just below an
    // integer; keep the half-open interval contract.
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// Fold engagement parameters into a single seed.
///
/// Weighted sum over every numeric field plus the character count of the
/// variant-B label; the weights are arbitrary fixed constants, chosen only
/// so that changing any one field moves the seed.
#[must_use]
pub fn engagement_seed(params: &EngagementParams) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let label_len = params.variant_b_label.chars().count() as f64;
    f64::from(params.sample_size) * 0.0137
        + f64::from(params.duration_weeks) * 1.93
        + params.baseline_rate * 0.611
        + params.minimum_detectable_effect * 2.77
        + label_len * 0.389
}

/// Fold self-report parameters into a single seed.
///
/// Sample size and duration only, per the simulation's contract.
#[must_use]
pub fn self_report_seed(params: &SelfReportParams) -> f64 {
    f64::from(params.sample_size) * 0.0137 + f64::from(params.duration_weeks) * 1.93
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Simulate an engagement A/B outcome.
///
/// Variant A is the baseline rate plus a small perturbation; variant B adds
/// a lift biased toward small positive values but capable of being
/// negative. Both rates clamp to `[0,1]` before conversion to one-decimal
/// percentages; the difference is computed from the rounded percentages.
/// Total function of its input, no error case.
#[must_use]
pub fn run_engagement_simulation(params: &EngagementParams) -> EngagementResult {
    let seed = engagement_seed(params);
    let baseline = params.baseline_rate / 100.0;

    let rate_a = (baseline + (seeded_random(seed) - 0.5) * 2.0 * ENGAGEMENT_JITTER).clamp(0.0, 1.0);
    // seed + 1 decorrelates the lift draw from the perturbation draw.
    let lift = seeded_random(seed + 1.0) * LIFT_SPAN - LIFT_OFFSET;
    let rate_b = (baseline + lift).clamp(0.0, 1.0);

    let variant_a_pct = round1(rate_a * 100.0);
    let variant_b_pct = round1(rate_b * 100.0);

    EngagementResult {
        variant_a_pct,
        variant_b_pct,
        difference_pp: round1(variant_b_pct - variant_a_pct),
    }
}

/// Simulate a self-report outcome across the five practice domains.
///
/// Each domain's simulated score is its baseline plus a small seeded
/// perturbation plus a fixed bonus, larger when the domain is emphasized,
/// clamped to `[1,5]`. Scores and the mean change report two decimals.
/// Total function of its input, no error case.
#[must_use]
pub fn run_self_report_simulation(params: &SelfReportParams) -> SelfReportResult {
    let seed = self_report_seed(params);

    let domains: [DomainOutcome; 5] = std::array::from_fn(|i| {
        let domain = PracticeDomain::ALL[i];
        let input = params.domain(domain);

        #[allow(clippy::cast_precision_loss)]
        let perturbation = (seeded_random(seed + i as f64) - 0.5) * 2.0 * SCORE_JITTER;
        let bonus = if input.emphasize {
            EMPHASIS_BONUS
        } else {
            BASE_BONUS
        };
        let simulated = (input.baseline + perturbation + bonus).clamp(1.0, 5.0);

        DomainOutcome {
            domain,
            baseline: round2(input.baseline),
            simulated: round2(simulated),
        }
    });

    let mean_change = round2(
        domains
            .iter()
            .map(|d| d.simulated - d.baseline)
            .sum::<f64>()
            / 5.0,
    );

    SelfReportResult {
        domains,
        mean_change,
    }
}

/// Gate decision for the engagement demo.
///
/// True when the observed difference sits below the minimum detectable
/// effect, or unconditionally when the manual override is set. Pure; no
/// statistics involved.
#[must_use]
pub fn gate_decision(difference_pp: f64, minimum_detectable_effect: f64, override_flag: bool) -> bool {
    override_flag || difference_pp.abs() < minimum_detectable_effect
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn sample_engagement() -> EngagementParams {
        EngagementParams::new(200, 4, 45.0, 3.0).with_variant_labels("Current", "Guided")
    }

    // seeded_random tests
    #[test]
    fn test_seeded_random_is_deterministic() {
        for seed in [-1000.0, -1.5, 0.0, 0.1, 7.0, 42.42, 100_000.0] {
            assert_eq!(seeded_random(seed), seeded_random(seed));
        }
    }

    #[test]
    fn test_seeded_random_in_unit_interval() {
        for i in -500..500 {
            let value = seeded_random(f64::from(i) * 0.731);
            assert!((0.0..1.0).contains(&value), "seed {i}: {value}");
        }
    }

    #[test]
    fn test_seeded_random_matches_reference_formula() {
        let seed = 42.0_f64;
        let v = seed.sin() * 10_000.0;
        assert_eq!(seeded_random(seed), v - v.floor());
    }

    #[test]
    fn test_seeded_random_spreads_over_distinct_seeds() {
        // Coarse uniformity check: consecutive integer seeds should not
        // collapse onto a narrow band.
        let values: Vec<f64> = (0..100).map(|i| seeded_random(f64::from(i))).collect();
        let below = values.iter().filter(|v| **v < 0.5).count();
        assert!((20..=80).contains(&below), "low-half count {below}");
    }

    // Seed folding tests
    #[test]
    fn test_engagement_seed_deterministic() {
        assert_eq!(
            engagement_seed(&sample_engagement()),
            engagement_seed(&sample_engagement())
        );
    }

    #[test]
    fn test_engagement_seed_sensitive_to_each_field() {
        let base = sample_engagement();
        let base_seed = engagement_seed(&base);

        let mut changed = base.clone();
        changed.sample_size = 201;
        assert_ne!(engagement_seed(&changed), base_seed);

        let mut changed = base.clone();
        changed.duration_weeks = 5;
        assert_ne!(engagement_seed(&changed), base_seed);

        let mut changed = base.clone();
        changed.baseline_rate = 50.0;
        assert_ne!(engagement_seed(&changed), base_seed);

        let mut changed = base.clone();
        changed.minimum_detectable_effect = 4.0;
        assert_ne!(engagement_seed(&changed), base_seed);

        let mut changed = base.clone();
        changed.variant_b_label = "Guided prompts".to_string();
        assert_ne!(engagement_seed(&changed), base_seed);
    }

    #[test]
    fn test_self_report_seed_sensitive_to_both_fields() {
        let base = SelfReportParams::uniform(50, 6, 3.0);
        let base_seed = self_report_seed(&base);

        let mut changed = base.clone();
        changed.sample_size = 51;
        assert_ne!(self_report_seed(&changed), base_seed);

        let mut changed = base.clone();
        changed.duration_weeks = 7;
        assert_ne!(self_report_seed(&changed), base_seed);
    }

    // Engagement simulation tests
    #[test]
    fn test_engagement_simulation_deterministic() {
        let params = sample_engagement();
        let first = run_engagement_simulation(&params);
        let second = run_engagement_simulation(&params);
        assert_eq!(first, second);
    }

    #[test]
    fn test_engagement_rates_in_percent_range() {
        let result = run_engagement_simulation(&sample_engagement());
        assert!((0.0..=100.0).contains(&result.variant_a_pct));
        assert!((0.0..=100.0).contains(&result.variant_b_pct));
    }

    #[test]
    fn test_engagement_difference_is_b_minus_a() {
        let result = run_engagement_simulation(&sample_engagement());
        assert_eq!(
            result.difference_pp,
            round1(result.variant_b_pct - result.variant_a_pct)
        );
    }

    #[test]
    fn test_engagement_rates_rounded_to_one_decimal() {
        let result = run_engagement_simulation(&sample_engagement());
        for value in [
            result.variant_a_pct,
            result.variant_b_pct,
            result.difference_pp,
        ] {
            assert!(((value * 10.0).round() - value * 10.0).abs() < 1e-9, "{value}");
        }
    }

    #[test]
    fn test_engagement_clamps_at_floor() {
        let params = EngagementParams::new(200, 4, 0.0, 3.0);
        let result = run_engagement_simulation(&params);
        assert!(result.variant_a_pct >= 0.0);
        assert!(result.variant_b_pct >= 0.0);
    }

    #[test]
    fn test_engagement_clamps_at_ceiling() {
        let params = EngagementParams::new(200, 4, 100.0, 3.0);
        let result = run_engagement_simulation(&params);
        assert!(result.variant_a_pct <= 100.0);
        assert!(result.variant_b_pct <= 100.0);
    }

    // Self-report simulation tests
    #[test]
    fn test_self_report_deterministic() {
        let params =
            SelfReportParams::uniform(50, 6, 3.2).emphasize(PracticeDomain::SocialAwareness);
        assert_eq!(
            run_self_report_simulation(&params),
            run_self_report_simulation(&params)
        );
    }

    #[test]
    fn test_self_report_domains_in_canonical_order() {
        let result = run_self_report_simulation(&SelfReportParams::uniform(50, 6, 3.0));
        for (i, outcome) in result.domains.iter().enumerate() {
            assert_eq!(outcome.domain, PracticeDomain::ALL[i]);
        }
    }

    #[test]
    fn test_self_report_echoes_baselines() {
        let mut params = SelfReportParams::uniform(50, 6, 3.0);
        params.domains[2].baseline = 4.1;
        let result = run_self_report_simulation(&params);
        assert_eq!(result.domains[2].baseline, 4.1);
        assert_eq!(result.domains[0].baseline, 3.0);
    }

    #[test]
    fn test_self_report_high_baseline_never_exceeds_five() {
        // Emphasized bonus plus maximal perturbation lands above 5; the
        // clamp must hold.
        for sample_size in 1..200 {
            let params = SelfReportParams::uniform(sample_size, 6, 4.9)
                .emphasize(PracticeDomain::SelfAwareness);
            let result = run_self_report_simulation(&params);
            assert!(result.outcome(PracticeDomain::SelfAwareness).simulated <= 5.0);
        }
    }

    #[test]
    fn test_self_report_low_baseline_never_below_one() {
        for sample_size in 1..200 {
            let params = SelfReportParams::uniform(sample_size, 6, 1.1);
            let result = run_self_report_simulation(&params);
            for outcome in &result.domains {
                assert!(outcome.simulated >= 1.0);
            }
        }
    }

    #[test]
    fn test_self_report_emphasis_bonus_exceeds_base_bonus() {
        assert!(EMPHASIS_BONUS > BASE_BONUS);

        // With identical baselines and the same per-domain draw, an
        // emphasized domain scores strictly higher than its unemphasized
        // rendition of the same simulation.
        let plain = SelfReportParams::uniform(80, 8, 3.0);
        let emphasized = plain.clone().emphasize(PracticeDomain::SelfManagement);

        let plain_result = run_self_report_simulation(&plain);
        let emphasized_result = run_self_report_simulation(&emphasized);

        assert!(
            emphasized_result.outcome(PracticeDomain::SelfManagement).simulated
                > plain_result.outcome(PracticeDomain::SelfManagement).simulated
        );
    }

    #[test]
    fn test_self_report_mean_change_consistent_with_domains() {
        let result = run_self_report_simulation(&SelfReportParams::uniform(50, 6, 3.0));
        let mean = result
            .domains
            .iter()
            .map(|d| d.simulated - d.baseline)
            .sum::<f64>()
            / 5.0;
        assert!((result.mean_change - round2(mean)).abs() < 1e-9);
    }

    #[test]
    fn test_self_report_scores_rounded_to_two_decimals() {
        let result = run_self_report_simulation(&SelfReportParams::uniform(73, 5, 3.37));
        for outcome in &result.domains {
            for value in [outcome.baseline, outcome.simulated] {
                assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6, "{value}");
            }
        }
    }

    // Gate decision tests
    #[test_case(2.0, 3.0, false => true; "below threshold")]
    #[test_case(4.0, 3.0, false => false; "above threshold")]
    #[test_case(4.0, 3.0, true => true; "override forces open")]
    #[test_case(-4.0, 3.0, false => false; "negative difference uses magnitude")]
    #[test_case(-2.0, 3.0, false => true; "small negative difference")]
    #[test_case(3.0, 3.0, false => false; "exactly at threshold")]
    fn test_gate_decision(difference: f64, mde: f64, override_flag: bool) -> bool {
        gate_decision(difference, mde, override_flag)
    }

    // Property tests
    proptest! {
        /// Byte-identical results for identical engagement parameters.
        #[test]
        fn prop_engagement_deterministic(
            sample_size in 1u32..100_000,
            duration_weeks in 1u32..52,
            baseline_rate in 0u32..=1000,
            mde in 1u32..200,
        ) {
            let params = EngagementParams::new(
                sample_size,
                duration_weeks,
                f64::from(baseline_rate) / 10.0,
                f64::from(mde) / 10.0,
            );
            prop_assert_eq!(
                run_engagement_simulation(&params),
                run_engagement_simulation(&params)
            );
        }

        /// Rates stay inside [0,100] for the full parameter space.
        #[test]
        fn prop_engagement_rates_bounded(
            sample_size in 1u32..100_000,
            duration_weeks in 1u32..52,
            baseline_rate in 0u32..=1000,
        ) {
            let params = EngagementParams::new(
                sample_size,
                duration_weeks,
                f64::from(baseline_rate) / 10.0,
                3.0,
            );
            let result = run_engagement_simulation(&params);
            prop_assert!((0.0..=100.0).contains(&result.variant_a_pct));
            prop_assert!((0.0..=100.0).contains(&result.variant_b_pct));
        }

        /// Changing the sample size changes the seed.
        #[test]
        fn prop_seed_sensitive_to_sample_size(
            sample_size in 1u32..100_000,
            delta in 1u32..1000,
        ) {
            let base = EngagementParams::new(sample_size, 4, 45.0, 3.0);
            let mut changed = base.clone();
            changed.sample_size = sample_size + delta;
            prop_assert_ne!(engagement_seed(&base), engagement_seed(&changed));
        }

        /// Simulated self-report scores always stay inside [1,5].
        #[test]
        fn prop_self_report_scores_bounded(
            sample_size in 1u32..100_000,
            duration_weeks in 1u32..52,
            baseline in 10u32..=50,
            emphasize_mask in 0u8..32,
        ) {
            let mut params = SelfReportParams::uniform(
                sample_size,
                duration_weeks,
                f64::from(baseline) / 10.0,
            );
            for (i, domain) in params.domains.iter_mut().enumerate() {
                domain.emphasize = emphasize_mask & (1 << i) != 0;
            }
            let result = run_self_report_simulation(&params);
            for outcome in &result.domains {
                prop_assert!((1.0..=5.0).contains(&outcome.simulated));
            }
        }

        /// The gate is always open under override.
        #[test]
        fn prop_gate_override_always_true(difference in -100.0f64..100.0, mde in 0.1f64..50.0) {
            prop_assert!(gate_decision(difference, mde, true));
        }
    }
}
