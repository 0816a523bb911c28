//! Canonical lexical pattern tables.
//!
//! One ordered table per agency label, matched as case-insensitive
//! substrings against a lowercased utterance. The tables are the behavioral
//! contract of the rule-based classifier: changing an entry changes
//! classification output, so treat edits as breaking changes.

use super::types::AgencyLabel;

/// Patterns indicating autonomous decision-making and ownership language.
pub const SELF_PATTERNS: &[&str] = &[
    "i decided",
    "i chose",
    "i picked",
    "i'm going to",
    "i am going to",
    "i plan to",
    "my plan",
    "i want to",
    "i made",
    "i adapted",
    "i came up with",
];

/// Patterns indicating deference, uncertainty, or passive acceptance.
pub const PROXY_PATTERNS: &[&str] = &[
    "i have no idea",
    "i don't know",
    "okay",
    "i'll go with",
    "you decide",
    "whatever you think",
    "whatever you suggest",
    "if you say so",
    "i guess",
    "sounds good",
    "tell me what to do",
    "not sure",
];

/// Patterns indicating collaborative or plural framing.
pub const COLLECTIVE_PATTERNS: &[&str] = &[
    "let's",
    "co-create",
    "we can",
    "we could",
    "we should",
    "together",
    "our class",
    "as a team",
    "both of us",
];

/// The pattern table for a label.
#[must_use]
pub const fn patterns_for(label: AgencyLabel) -> &'static [&'static str] {
    match label {
        AgencyLabel::SelfDirected => SELF_PATTERNS,
        AgencyLabel::Proxy => PROXY_PATTERNS,
        AgencyLabel::Collective => COLLECTIVE_PATTERNS,
    }
}
