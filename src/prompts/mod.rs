//! Prompt templates.
//!
//! This module provides the fixed evaluation instruction set sent to the
//! text-completion collaborator for transcript agency classification, plus
//! the user-prompt builder that numbers the utterances to label.
//!
//! # Example
//!
//! ```
//! use agency_eval::prompts::{agency_system_prompt, agency_user_prompt};
//!
//! let system = agency_system_prompt();
//! assert!(system.contains("\"labels\""));
//!
//! let user = agency_user_prompt(&["Okay, I'll go with that.".to_string()]);
//! assert!(user.contains("1. Okay, I'll go with that."));
//! ```

use std::fmt::Write as _;

/// System prompt for the agency classification call.
///
/// Describes the three labels and the required JSON output schema. One label
/// object per utterance, in input order.
#[must_use]
pub const fn agency_system_prompt() -> &'static str {
    r#"You are an evaluator of teacher agency in conversations with an AI assistant.

Classify each numbered teacher utterance into exactly one of three categories:
- "self": the teacher makes or owns a decision (autonomous decision-making, ownership language)
- "proxy": the teacher defers to the assistant, expresses uncertainty, or passively accepts a suggestion
- "collective": the teacher frames the work as shared or collaborative (plural framing, co-creation)

Respond with a JSON object in this exact format:
{
  "labels": [
    {"label": "self|proxy|collective", "confidence": 0.9}
  ]
}

Important:
- Return exactly one label object per numbered utterance, in the same order
- "confidence" is a number between 0.0 and 1.0
- Respond with the JSON object only, no commentary"#
}

/// Build the user prompt listing the utterances to classify.
///
/// Utterances are numbered from 1 so the label order is unambiguous.
#[must_use]
pub fn agency_user_prompt(utterances: &[String]) -> String {
    let mut prompt = String::from("Classify the following teacher utterances:\n\n");
    for (i, utterance) in utterances.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(prompt, "{}. {utterance}", i + 1);
    }
    prompt
}
