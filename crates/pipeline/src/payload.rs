//! Parsing and normalization of raw provider output.
//!
//! The provider is asked for a JSON object but nothing guarantees it. A
//! payload that is not a JSON object is rejected as malformed. Inside an
//! object, each field falls back to a safe default on its own:
//!
//! | Field       | Kept when                         | Otherwise   |
//! |-------------|-----------------------------------|-------------|
//! | `sentiment` | string naming a known sentiment   | `neutral`   |
//! | `summary`   | string                            | `""`        |
//! | `topics`    | array made only of strings        | `[]`        |
//!
//! Unknown keys are ignored.

use journal_analyzer::error::truncate_chars;
use journal_core::analysis::Sentiment;
use serde_json::{Map, Value};

use crate::error::AnalysisError;

/// Characters of raw payload kept in a [`AnalysisError::Malformed`] excerpt.
pub const EXCERPT_CHARS: usize = 200;

/// Provider output after field-by-field normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload {
    pub sentiment: Sentiment,
    pub summary: String,
    pub topics: Vec<String>,
}

/// Parse raw provider output into a JSON object.
///
/// A single surrounding markdown code fence (` ```json ... ``` `) is
/// tolerated. Anything else that is not a JSON object is malformed.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, AnalysisError> {
    let body = strip_code_fence(raw.trim());
    let malformed = |reason: String| AnalysisError::Malformed {
        reason,
        excerpt: truncate_chars(raw, EXCERPT_CHARS),
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

/// Apply the per-field defaults to a parsed payload.
pub fn normalize(map: &Map<String, Value>) -> NormalizedPayload {
    let sentiment = match map.get("sentiment") {
        Some(Value::String(label)) => Sentiment::parse_label(label).unwrap_or_else(|| {
            tracing::warn!(sentiment = %label, "Unknown sentiment from analyzer, using neutral");
            Sentiment::Neutral
        }),
        Some(other) => {
            tracing::warn!(kind = json_kind(other), "Non-string sentiment from analyzer, using neutral");
            Sentiment::Neutral
        }
        None => {
            tracing::warn!("Analyzer omitted sentiment, using neutral");
            Sentiment::Neutral
        }
    };

    let summary = match map.get("summary") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            tracing::warn!(kind = json_kind(other), "Non-string summary from analyzer, using empty");
            String::new()
        }
        None => {
            tracing::warn!("Analyzer omitted summary, using empty");
            String::new()
        }
    };

    let topics = match map.get("topics") {
        Some(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            strings.unwrap_or_else(|| {
                tracing::warn!("Analyzer topics contain non-string items, using none");
                Vec::new()
            })
        }
        Some(other) => {
            tracing::warn!(kind = json_kind(other), "Non-array topics from analyzer, using none");
            Vec::new()
        }
        None => {
            tracing::warn!("Analyzer omitted topics, using none");
            Vec::new()
        }
    };

    NormalizedPayload {
        sentiment,
        summary,
        topics,
    }
}

/// Parse and normalize in one step.
pub fn parse_payload(raw: &str) -> Result<NormalizedPayload, AnalysisError> {
    parse_object(raw).map(|map| normalize(&map))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening line.
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
