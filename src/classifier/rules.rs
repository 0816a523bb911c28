//! Rule-based transcript classification.
//!
//! The deterministic baseline path: utterance extraction, per-utterance
//! lexical classification, aggregation, and the plain-language summary.
//! Every function here is pure; the same input always produces the same
//! output, which is what makes this path a safe fallback for the LLM route.

use crate::error::ClassifyError;

use super::patterns::patterns_for;
use super::types::{top_label, AgencyLabel, AggregateResult, LinePrediction, TranscriptReport};

/// Extract the designated speaker's utterances from a raw transcript.
///
/// Splits on line breaks; a line is retained when its
/// leading-whitespace-trimmed form starts with `speaker_prefix`
/// (case-insensitive). The retained utterance is the trimmed text after the
/// prefix, in original order. Lines from any other speaker are dropped.
///
/// An empty result is valid output here; [`classify_transcript`] turns it
/// into the structured no-utterances error.
#[must_use]
pub fn extract_utterances(transcript: &str, speaker_prefix: &str) -> Vec<String> {
    transcript
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let head = trimmed.get(..speaker_prefix.len())?;
            if head.eq_ignore_ascii_case(speaker_prefix) {
                Some(trimmed[speaker_prefix.len()..].trim().to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Classify one utterance into an agency label.
///
/// Scores each label by the number of *distinct* patterns from its table
/// that occur as a case-insensitive substring (a pattern occurring twice
/// still counts once). The strictly highest score wins; any tie at the top,
/// including the zero-match case, resolves to [`AgencyLabel::SelfDirected`].
#[must_use]
pub fn classify_utterance(utterance: &str) -> AgencyLabel {
    let lowered = utterance.to_lowercase();
    let counts = AgencyLabel::ALL.map(|label| {
        patterns_for(label)
            .iter()
            .filter(|pattern| lowered.contains(*pattern))
            .count()
    });
    top_label(counts)
}

/// Classify a full transcript for one speaker.
///
/// # Errors
///
/// Returns [`ClassifyError::NoUtterances`] when no line matches the speaker
/// prefix; this is the structured "provide input in the expected format"
/// result, not a crash, and it is the only error this function produces.
pub fn classify_transcript(
    transcript: &str,
    speaker_prefix: &str,
) -> Result<TranscriptReport, ClassifyError> {
    let utterances = extract_utterances(transcript, speaker_prefix);
    if utterances.is_empty() {
        return Err(ClassifyError::NoUtterances {
            speaker_prefix: speaker_prefix.to_string(),
        });
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

/// Build the full report for an already-classified prediction sequence.
pub(crate) fn report_from_predictions(predictions: Vec<LinePrediction>) -> TranscriptReport {
    let aggregate = AggregateResult::from_predictions(&predictions);
    let summary = summarize(&aggregate);
    TranscriptReport {
        predictions,
        aggregate,
        summary,
    }
}

/// Render the plain-language summary of an aggregate.
///
/// Names the dominant label and its percentage, then each label's message
/// count and percentage. Derived view only; nothing downstream parses it.
#[must_use]
pub fn summarize(aggregate: &AggregateResult) -> String {
    let dominant = aggregate.dominant();
    let dominant_pct = aggregate.stats(dominant).share * 100.0;

    let breakdown = AgencyLabel::ALL
        .map(|label| {
            let stats = aggregate.stats(label);
            format!(
                "{label}: {} messages ({:.1}%)",
                stats.count,
                stats.share * 100.0
            )
        })
        .join(", ");

    format!(
        "Dominant agency: {dominant} ({dominant_pct:.1}% of {} messages). {breakdown}.",
        aggregate.total
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const SAMPLE_TRANSCRIPT: &str = "\
Teacher: I have no idea what to do for SEL today.
ChatSEL: How about a mindfulness breathing exercise called square breathing?
Teacher: Okay, I'll go with that.
Teacher: Let's co-create one now!";

    // extract_utterances tests
    #[test]
    fn test_extract_keeps_only_prefixed_lines_in_order() {
        let utterances = extract_utterances(SAMPLE_TRANSCRIPT, "Teacher:");
        assert_eq!(
            utterances,
            vec![
                "I have no idea what to do for SEL today.",
                "Okay, I'll go with that.",
                "Let's co-create one now!",
            ]
        );
    }

    #[test]
    fn test_extract_prefix_match_is_case_insensitive() {
        let utterances = extract_utterances("TEACHER: Hello\nteacher: World", "Teacher:");
        assert_eq!(utterances, vec!["Hello", "World"]);
    }

    #[test]
    fn test_extract_ignores_leading_whitespace() {
        let utterances = extract_utterances("   Teacher:   spaced out   ", "Teacher:");
        assert_eq!(utterances, vec!["spaced out"]);
    }

    #[test]
    fn test_extract_no_matches_returns_empty() {
        let utterances = extract_utterances("ChatSEL: hello\nChatSEL: how can I help?", "Teacher:");
        assert!(utterances.is_empty());
    }

    #[test]
    fn test_extract_empty_transcript_returns_empty() {
        assert!(extract_utterances("", "Teacher:").is_empty());
        assert!(extract_utterances("   \n\n  ", "Teacher:").is_empty());
    }

    #[test]
    fn test_extract_non_ascii_line_shorter_than_prefix() {
        // Multi-byte content must not panic on the prefix slice.
        let utterances = extract_utterances("é\nTeacher: ok", "Teacher:");
        assert_eq!(utterances, vec!["ok"]);
    }

    // classify_utterance tests
    #[test_case("I have no idea what to do for SEL today." => AgencyLabel::Proxy; "deference via no idea")]
    #[test_case("Okay, I'll go with that." => AgencyLabel::Proxy; "passive acceptance")]
    #[test_case("Let's co-create one now!" => AgencyLabel::Collective; "co-creation")]
    #[test_case("I decided to run a morning circle." => AgencyLabel::SelfDirected; "ownership")]
    #[test_case("We could try it together." => AgencyLabel::Collective; "plural framing")]
    #[test_case("You decide, whatever you think works." => AgencyLabel::Proxy; "full deference")]
    #[test_case("hello there" => AgencyLabel::SelfDirected; "zero matches default")]
    #[test_case("" => AgencyLabel::SelfDirected; "empty utterance default")]
    fn test_classify_utterance(utterance: &str) -> AgencyLabel {
        classify_utterance(utterance)
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify_utterance("OKAY, I'LL GO WITH THAT."), AgencyLabel::Proxy);
    }

    #[test]
    fn test_classify_distinct_patterns_not_occurrences() {
        // "okay okay okay" is one distinct proxy pattern; a single
        // collective pattern plus one more distinct collective pattern must
        // outrank it.
        assert_eq!(
            classify_utterance("okay okay okay, let's do it together"),
            AgencyLabel::Collective
        );
    }

    #[test]
    fn test_classify_tie_between_labels_defaults_to_self() {
        // One proxy pattern and one collective pattern.
        assert_eq!(
            classify_utterance("okay, together then"),
            AgencyLabel::SelfDirected
        );
    }

    #[test]
    fn test_classify_is_pure() {
        let utterance = "Okay, I'll go with that.";
        assert_eq!(classify_utterance(utterance), classify_utterance(utterance));
    }

    // classify_transcript tests
    #[test]
    fn test_classify_transcript_sample_scenario() {
        let report = classify_transcript(SAMPLE_TRANSCRIPT, "Teacher:").unwrap();

        assert_eq!(report.predictions.len(), 3);
        assert_eq!(report.predictions[0].label, AgencyLabel::Proxy);
        assert_eq!(report.predictions[1].label, AgencyLabel::Proxy);
        assert_eq!(report.predictions[2].label, AgencyLabel::Collective);

        assert_eq!(report.aggregate.total, 3);
        assert_eq!(report.aggregate.proxy.count, 2);
        assert_eq!(report.aggregate.collective.count, 1);
        assert_eq!(report.aggregate.self_directed.count, 0);
        assert!((report.aggregate.proxy.share - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.aggregate.collective.share - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.aggregate.self_directed.share, 0.0);
    }

    #[test]
    fn test_classify_transcript_no_utterances_is_structured_error() {
        let result = classify_transcript("ChatSEL: hello\nChatSEL: how can I help?", "Teacher:");
        assert_eq!(
            result.unwrap_err(),
            ClassifyError::NoUtterances {
                speaker_prefix: "Teacher:".to_string()
            }
        );
    }

    #[test]
    fn test_classify_transcript_empty_input_is_structured_error() {
        let result = classify_transcript("", "Teacher:");
        assert!(matches!(result, Err(ClassifyError::NoUtterances { .. })));
    }

    #[test]
    fn test_classify_transcript_rule_based_has_no_confidence() {
        let report = classify_transcript(SAMPLE_TRANSCRIPT, "Teacher:").unwrap();
        assert!(report.predictions.iter().all(|p| p.confidence.is_none()));
        assert!(report.aggregate.proxy.mean_confidence.is_none());
    }

    #[test]
    fn test_classify_transcript_unrelated_lines_do_not_affect_result() {
        // Same Teacher: lines, shuffled counterpart lines around them.
        let shuffled = "\
ChatSEL: something new up top
Teacher: I have no idea what to do for SEL today.
Teacher: Okay, I'll go with that.
ChatSEL: moved down here
ChatSEL: and another
Teacher: Let's co-create one now!";

        let baseline = classify_transcript(SAMPLE_TRANSCRIPT, "Teacher:").unwrap();
        let reordered = classify_transcript(shuffled, "Teacher:").unwrap();

        assert_eq!(baseline.predictions, reordered.predictions);
        assert_eq!(baseline.aggregate, reordered.aggregate);
    }

    // summarize tests
    #[test]
    fn test_summarize_names_dominant_label() {
        let report = classify_transcript(SAMPLE_TRANSCRIPT, "Teacher:").unwrap();
        assert!(report.summary.contains("proxy"));
        assert!(report.summary.contains("66.7%"));
    }

    #[test]
    fn test_summarize_lists_every_label() {
        let report = classify_transcript(SAMPLE_TRANSCRIPT, "Teacher:").unwrap();
        for label in AgencyLabel::ALL {
            assert!(report.summary.contains(label.as_str()));
        }
    }

    // Property tests
    proptest! {
        /// Shares always sum to 1 for any non-empty transcript.
        #[test]
        fn prop_shares_sum_to_one(lines in proptest::collection::vec(".{0,60}", 1..20)) {
            let transcript = lines
                .iter()
                .map(|l| format!("Teacher: {l}"))
                .collect::<Vec<_>>()
                .join("\n");
            let report = classify_transcript(&transcript, "Teacher:").unwrap();
            let sum = report.aggregate.self_directed.share
                + report.aggregate.proxy.share
                + report.aggregate.collective.share;
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        /// Classification is deterministic for arbitrary utterances.
        #[test]
        fn prop_classify_deterministic(utterance in ".{0,120}") {
            prop_assert_eq!(classify_utterance(&utterance), classify_utterance(&utterance));
        }

        /// Non-matching filler lines never change the report.
        #[test]
        fn prop_filler_lines_ignored(filler in proptest::collection::vec("[^\\r\\n]{0,40}", 0..8)) {
            let base = "Teacher: Okay, I'll go with that.\nTeacher: Let's co-create one now!";
            let mut lines: Vec<String> = vec!["Teacher: Okay, I'll go with that.".to_string()];
            for f in &filler {
                // Keep filler from accidentally matching the prefix.
                lines.push(format!("ChatSEL: {f}"));
            }
            lines.push("Teacher: Let's co-create one now!".to_string());
            let noisy = lines.join("\n");

            let expected = classify_transcript(base, "Teacher:").unwrap();
            let actual = classify_transcript(&noisy, "Teacher:").unwrap();
            prop_assert_eq!(expected.predictions, actual.predictions);
            prop_assert_eq!(expected.aggregate, actual.aggregate);
        }
    }
}
