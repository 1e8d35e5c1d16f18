//! HTTP server settings and the analyzer facts the server reports.

use std::str::FromStr;
use std::time::Duration;

use journal_analyzer::retry::RetryConfig;
use journal_analyzer::AzureOpenAiConfig;
use serde::Serialize;

/// Server configuration.
///
/// | Env Var                 | Default                 |
/// |-------------------------|-------------------------|
/// | `HOST`                  | `0.0.0.0`               |
/// | `PORT`                  | `3000`                  |
/// | `CORS_ORIGINS`          | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`  | `60`                    |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Whole-request budget. Must exceed the worst-case analysis time, see
    /// [`ServerConfig::check_analysis_budget`].
    pub request_timeout_secs: u64,
    /// Longest wait for open connections to drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

/// The HTTP timeout would cut analyses short with a bare 408.
#[derive(Debug, thiserror::Error)]
#[error(
    "REQUEST_TIMEOUT_SECS ({request_timeout:?}) must exceed the worst-case analysis time \
     ({analysis_budget:?}); raise it or lower AZURE_OPENAI_TIMEOUT_SECS / AZURE_OPENAI_MAX_RETRIES"
)]
pub struct TimeoutBudgetError {
    pub request_timeout: Duration,
    pub analysis_budget: Duration,
}

impl ServerConfig {
    /// Load from the process environment. Panics on unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Panics on unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_var(&lookup, "PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 60),
            shutdown_timeout_secs: parse_var(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Ensure a request can outlive the slowest possible analysis, so
    /// provider timeouts reach the client as `ANALYSIS_TIMEOUT`.
    pub fn check_analysis_budget(&self, analysis_budget: Duration) -> Result<(), TimeoutBudgetError> {
        if self.request_timeout() > analysis_budget {
            Ok(())
        } else {
            Err(TimeoutBudgetError {
                request_timeout: self.request_timeout(),
                analysis_budget,
            })
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has invalid value '{raw}': {e}")),
    }
}

/// Analyzer settings as reported by `/health`. Never carries the key or
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerProfile {
    pub deployment: String,
    pub api_version: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retries_enabled: bool,
    /// Longest one analysis can take, retries and backoff included.
    pub worst_case_ms: u64,
}

impl AnalyzerProfile {
    pub fn new(config: &AzureOpenAiConfig, retry: &RetryConfig) -> Self {
        Self {
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
            timeout_ms: config.request_timeout.as_millis() as u64,
            max_retries: retry.max_retries,
            retries_enabled: retry.max_retries > 0,
            worst_case_ms: retry.worst_case(config.request_timeout).as_millis() as u64,
        }
    }
}
