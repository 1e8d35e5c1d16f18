use std::time::Duration;

use crate::config::ConfigError;

/// Maximum number of characters of a provider error body kept for diagnostics.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Errors from the analyzer boundary.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Required provider settings are missing or invalid. Detected before
    /// any network activity.
    #[error("Analyzer is not configured: {0}")]
    Configuration(#[from] ConfigError),

    /// The provider did not answer within the request timeout.
    #[error("Analyzer request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Analyzer request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Analyzer provider error ({status}): {body}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to [`ERROR_BODY_LIMIT`] characters.
        body: String,
    },

    /// The provider answered 2xx but the response envelope could not be decoded.
    #[error("Analyzer returned an undecodable response: {0}")]
    InvalidResponse(String),

    /// The provider answered but produced no content.
    #[error("Analyzer returned an empty response")]
    EmptyResponse,
}

impl AnalyzerError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Timeouts, transport failures, rate limiting (429), and server errors
    /// (5xx) are transient. Configuration problems, client errors, and
    /// content problems are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Provider { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Configuration(_) | Self::InvalidResponse(_) | Self::EmptyResponse => false,
        }
    }
}

/// Truncate `text` to at most `limit` characters, appending `…` when cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
