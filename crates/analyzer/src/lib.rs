//! Boundary adapter for the external language-analysis provider.
//!
//! [`Analyzer`] is the single operation the rest of the workspace sees:
//! send an instruction plus entry text, get back the provider's raw output
//! or a typed [`AnalyzerError`]. [`client::AzureOpenAiClient`] implements it
//! against Azure OpenAI chat completions; [`retry::RetryingAnalyzer`] is an
//! opt-in decorator adding backoff on transient failures.

pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod retry;

pub use client::AzureOpenAiClient;
pub use config::{AzureOpenAiConfig, ConfigError};
pub use error::AnalyzerError;

/// One analysis call's worth of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Fixed instruction describing the required output shape.
    pub system_prompt: String,
    /// The entry text to analyze.
    pub user_text: String,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

/// A provider able to analyze text.
///
/// Implementations perform at most the work needed for one provider call
/// and must be safe to share across concurrent requests.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    /// Send `request` to the provider and return its raw textual output.
    ///
    /// An empty or absent output is an error ([`AnalyzerError::EmptyResponse`]),
    /// never an empty `Ok`.
    async fn analyze_raw(&self, request: &AnalysisRequest) -> Result<String, AnalyzerError>;
}
