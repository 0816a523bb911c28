//! Scenario-driven experiment simulation.
//!
//! The secondary evaluation pipeline: deterministic "observed" outcomes for
//! an engagement A/B test and a five-domain self-report test, fabricated
//! from user-supplied parameters via a seeded pseudo-random generator.
//! Identical parameters always reproduce identical outputs, which is what
//! lets a planning demo gate downstream steps on the numbers it shows.
//!
//! # Example
//!
//! ```
//! use agency_eval::simulator::{run_engagement_simulation, gate_decision, EngagementParams};
//!
//! let params = EngagementParams::new(200, 4, 45.0, 3.0);
//! let result = run_engagement_simulation(&params);
//! assert_eq!(result, run_engagement_simulation(&params));
//!
//! let below_mde = gate_decision(result.difference_pp, 3.0, false);
//! let forced_open = gate_decision(result.difference_pp, 3.0, true);
//! assert!(forced_open);
//! # let _ = below_mde;
//! ```

mod engine;
mod types;

pub use engine::{
    engagement_seed, gate_decision, run_engagement_simulation, run_self_report_simulation,
    seeded_random, self_report_seed,
};
pub use types::{
    DomainOutcome, DomainParams, EngagementParams, EngagementResult, PracticeDomain,
    SelfReportParams, SelfReportResult,
};
