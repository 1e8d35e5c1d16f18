use journal_analyzer::AnalyzerError;

/// Reasons an analysis produced no result.
///
/// The analyzed entry is never affected by any of these.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The analyzer client failed (configuration, timeout, transport,
    /// provider error, empty response).
    #[error(transparent)]
    Client(#[from] AnalyzerError),

    /// The provider answered with something that is not a JSON object.
    #[error("Malformed analysis payload ({reason}): {excerpt}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
        /// Start of the raw payload, truncated for logs and responses.
        excerpt: String,
    },

    /// The caller stopped waiting before the provider answered.
    #[error("Analysis was cancelled")]
    Cancelled,
}
