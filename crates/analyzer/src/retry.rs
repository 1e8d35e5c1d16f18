//! Opt-in exponential-backoff retries around any [`Analyzer`].
//!
//! The base client never retries. Wrapping it in [`RetryingAnalyzer`] is an
//! explicit policy decision made by whoever assembles the service. Only
//! failures reported as [`AnalyzerError::is_transient`] are retried.

use std::time::Duration;

use crate::{AnalysisRequest, Analyzer, AnalyzerError};

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt. `0` means a single attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Longest a wrapped call can run when every attempt hits
    /// `attempt_timeout`: all attempts plus the backoff sleeps between them.
    pub fn worst_case(&self, attempt_timeout: Duration) -> Duration {
        let mut total = attempt_timeout;
        let mut delay = self.initial_delay;
        for _ in 0..self.max_retries {
            total = total.saturating_add(delay).saturating_add(attempt_timeout);
            delay = next_delay(delay, self);
        }
        total
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Decorator that retries transient failures of the wrapped analyzer.
pub struct RetryingAnalyzer<A> {
    inner: A,
    config: RetryConfig,
}

impl<A: Analyzer> RetryingAnalyzer<A> {
    pub fn new(inner: A, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait::async_trait]
impl<A: Analyzer> Analyzer for RetryingAnalyzer<A> {
    async fn analyze_raw(&self, request: &AnalysisRequest) -> Result<String, AnalyzerError> {
        let mut delay = self.config.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.inner.analyze_raw(request).await {
                Ok(output) => return Ok(output),
                Err(err) if err.is_transient() && attempt <= self.config.max_retries => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Analyzer call failed, retrying",
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay, &self.config);
                }
                Err(err) => {
                    if attempt > 1 {
                        tracing::error!(attempt, error = %err, "Analyzer call failed after retries");
                    }
                    return Err(err);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
