//! Agency evaluation CLI entry point.
//!
//! A thin demo driver over the library: classification reads a transcript
//! from stdin and prints the report as JSON; the simulation commands print
//! the outcome of a fixed demo parameter set. All logs go to stderr; stdout
//! carries only the JSON result so the output can be piped.

use std::io::Read as _;
use std::process::ExitCode;

use agency_eval::classifier::AgencyClassifier;
use agency_eval::config::Config;
use agency_eval::error::ClassifyError;
use agency_eval::simulator::{
    run_engagement_simulation, run_self_report_simulation, EngagementParams, PracticeDomain,
    SelfReportParams,
};

const USAGE: &str = "usage: agency-eval <classify|simulate-engagement|simulate-self-report>

  classify                reads a transcript from stdin, prints the report as JSON
  simulate-engagement     prints a demo engagement A/B simulation as JSON
  simulate-self-report    prints a demo self-report simulation as JSON";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging to stderr only (stdout is for JSON results)
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let Some(command) = std::env::args().nth(1) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match command.as_str() {
        "classify" => classify().await,
        "simulate-engagement" => {
            let params = EngagementParams::new(200, 4, 45.0, 3.0)
                .with_variant_labels("Current lessons", "AI-guided lessons");
            print_json(&run_engagement_simulation(&params))
        }
        "simulate-self-report" => {
            let params =
                SelfReportParams::uniform(60, 6, 3.2).emphasize(PracticeDomain::SocialAwareness);
            print_json(&run_self_report_simulation(&params))
        }
        other => {
            eprintln!("unknown command: {other}\n{USAGE}");
            ExitCode::FAILURE
        }
    }
}

/// Run the classification flow over stdin.
async fn classify() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let classifier = match AgencyClassifier::from_config(&config) {
        Ok(classifier) => classifier,
        Err(e) => {
            tracing::error!("Client setup error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut transcript = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut transcript) {
        tracing::error!("Failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }

    match classifier.classify(&transcript, &config.speaker_prefix).await {
        Ok(report) => print_json(&report),
        Err(ClassifyError::NoUtterances { speaker_prefix }) => {
            eprintln!(
                "No utterances found: provide transcript lines starting with {speaker_prefix:?}"
            );
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("Classification error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Print a value as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to serialize result: {e}");
            ExitCode::FAILURE
        }
    }
}
