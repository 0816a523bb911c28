//! Parsing helpers for LLM classification responses.
//!
//! The collaborator is instructed to answer with
//! `{"labels": [{"label": "...", "confidence": 0.x}, ...]}` but models wrap
//! JSON in Markdown fences often enough that extraction has to tolerate it.
//! Returns [`ClassifyError`] variants for absent fields, unknown labels,
//! out-of-range confidences, and count mismatches; the service layer treats
//! any of them as a reason to fall back to the rule-based path.

use std::str::FromStr;

use crate::error::ClassifyError;

use super::types::AgencyLabel;

/// Extract JSON from an LLM response, handling multiple formats.
///
/// Tries, in order: a raw JSON parse, a ```` ```json ```` fenced block, a
/// generic ```` ``` ```` fenced block, and finally a balanced-brace object
/// found anywhere in the text.
///
/// # Errors
///
/// Returns [`ClassifyError::JsonParseFailed`] if no valid JSON can be
/// extracted.
pub fn extract_json(text: &str) -> Result<serde_json::Value, ClassifyError> {
    let trimmed = text.trim();

    // Fast path: raw JSON
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```json") {
        if let Ok(value) = serde_json::from_str(&json_str) {
            return Ok(value);
        }
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```") {
        if let Ok(value) = serde_json::from_str(&json_str) {
            return Ok(value);
        }
    }

    if let Some(json_str) = extract_balanced_braces(trimmed) {
        if let Ok(value) = serde_json::from_str(&json_str) {
            return Ok(value);
        }
    }

    let preview: String = text.chars().take(100).collect();
    Err(ClassifyError::JsonParseFailed {
        message: format!("No valid JSON found in response: {preview}"),
    })
}

/// Extract content from a code block with the given opening fence.
fn extract_from_code_block(text: &str, fence: &str) -> Option<String> {
    let start_idx = text.find(fence)?;
    let remaining = text[start_idx + fence.len()..].trim_start();
    let end_idx = remaining.find("```")?;
    let json_str = remaining[..end_idx].trim();

    if json_str.is_empty() {
        return None;
    }

    Some(json_str.to_string())
}

/// Find the first balanced `{...}` object in the text.
fn extract_balanced_braces(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(text[start..=start + offset].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the `labels` array into `(label, confidence)` pairs.
///
/// # Errors
///
/// Returns:
/// - [`ClassifyError::MissingField`] when `labels`, `label`, or
///   `confidence` is absent
/// - [`ClassifyError::InvalidValue`] for an unknown label string or a
///   confidence outside `[0,1]`
/// - [`ClassifyError::LabelCountMismatch`] when the array length differs
///   from the number of utterances sent
pub fn parse_labels(
    json: &serde_json::Value,
    expected: usize,
) -> Result<Vec<(AgencyLabel, f64)>, ClassifyError> {
    let labels_array = json
        .get("labels")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| ClassifyError::MissingField {
            field: "labels".to_string(),
        })?;

    if labels_array.len() != expected {
        return Err(ClassifyError::LabelCountMismatch {
            expected,
            actual: labels_array.len(),
        });
    }

    labels_array
        .iter()
        .map(|entry| {
            let label_str = entry
                .get("label")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| ClassifyError::MissingField {
                    field: "label".to_string(),
                })?;

            let label = AgencyLabel::from_str(label_str).map_err(|e| {
                ClassifyError::InvalidValue {
                    field: "label".to_string(),
                    reason: e.to_string(),
                }
            })?;

            let confidence = entry
                .get("confidence")
                .and_then(serde_json::Value::as_f64)
                .ok_or_else(|| ClassifyError::MissingField {
                    field: "confidence".to_string(),
                })?;

            if !(0.0..=1.0).contains(&confidence) {
                return Err(ClassifyError::InvalidValue {
                    field: "confidence".to_string(),
                    reason: format!("must be between 0.0 and 1.0, got {confidence}"),
                });
            }

            Ok((label, confidence))
        })
        .collect()
}
