//! Central analysis orchestrator.
//!
//! Held in the API state as an `Arc<AnalysisOrchestrator>` and shared by
//! all requests. It keeps no per-call state, so concurrent analyses of
//! different entries need no coordination.

use std::sync::Arc;
use std::time::Instant;

use journal_analyzer::{AnalysisRequest, Analyzer};
use journal_core::analysis::AnalysisResult;
use journal_core::entry::Entry;
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::payload::parse_payload;
use crate::prompt::{compose_entry_text, DEFAULT_MAX_OUTPUT_TOKENS, SYSTEM_PROMPT};

/// Runs the analysis of a single entry.
///
/// Lifecycle of one call:
/// 1. Compose the labelled entry text.
/// 2. Send it with the fixed instruction to the analyzer (one call, no retry).
/// 3. Convert client failures into [`AnalysisError::Client`].
/// 4. Reject output that is not a JSON object as [`AnalysisError::Malformed`].
/// 5. Normalize fields, falling back to per-field defaults.
/// 6. Stamp the result and tag it with the entry id.
pub struct AnalysisOrchestrator {
    analyzer: Arc<dyn Analyzer>,
    max_output_tokens: u32,
}

impl AnalysisOrchestrator {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Override the output token budget sent with each request.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Build the provider request for an entry.
    pub fn build_request(&self, entry: &Entry) -> AnalysisRequest {
        AnalysisRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_text: compose_entry_text(entry),
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Analyze an entry.
    ///
    /// The entry is only read. Any failure leaves it exactly as it was.
    pub async fn analyze(&self, entry: &Entry) -> Result<AnalysisResult, AnalysisError> {
        let entry_id = entry.id();
        let request = self.build_request(entry);
        let started = Instant::now();

        let raw = match self.analyzer.analyze_raw(&request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(
                    %entry_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "Analyzer call failed",
                );
                return Err(AnalysisError::Client(err));
            }
        };

        let payload = parse_payload(&raw).inspect_err(|err| {
            tracing::warn!(%entry_id, error = %err, "Analyzer returned a malformed payload");
        })?;

        let result = AnalysisResult::new(entry_id, payload.sentiment, payload.summary, payload.topics);

        tracing::info!(
            %entry_id,
            sentiment = %result.sentiment,
            topics = result.topics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Entry analyzed",
        );

        Ok(result)
    }

    /// Analyze an entry unless `cancel` fires first.
    ///
    /// When the token is cancelled the call returns
    /// [`AnalysisError::Cancelled`] at once and the in-flight provider
    /// request is dropped.
    pub async fn analyze_with_cancel(
        &self,
        entry: &Entry,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(entry_id = %entry.id(), "Analysis cancelled");
                Err(AnalysisError::Cancelled)
            }
            result = self.analyze(entry) => result,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
