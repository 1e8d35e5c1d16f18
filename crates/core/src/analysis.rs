//! Analysis result types.
//!
//! An [`AnalysisResult`] is derived from one entry's text by the external
//! provider. It only references its entry by id and is never mutated once
//! built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{EntryId, Timestamp};

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Overall tone of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Parse a provider-supplied label.
    ///
    /// Surrounding whitespace and letter case are ignored. Returns `None`
    /// for anything outside the three known values.
    pub fn parse_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Validated analysis of a single entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Id of the analyzed entry.
    pub entry_id: EntryId,
    pub sentiment: Sentiment,
    /// Short summary, requested as two sentences. May be empty when the
    /// provider omitted it.
    pub summary: String,
    /// Key topics in provider order. Two to four are requested but the
    /// count is not enforced.
    pub topics: Vec<String>,
    /// When the analysis completed.
    pub created_at: Timestamp,
}

impl AnalysisResult {
    /// Assemble a result stamped with the current time.
    pub fn new(entry_id: EntryId, sentiment: Sentiment, summary: String, topics: Vec<String>) -> Self {
        Self {
            entry_id,
            sentiment,
            summary,
            topics,
            created_at: chrono::Utc::now(),
        }
    }
}
