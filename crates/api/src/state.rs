use std::sync::Arc;

use journal_pipeline::AnalysisOrchestrator;
use tokio_util::sync::CancellationToken;

use crate::config::{AnalyzerProfile, ServerConfig};

/// Shared handler state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: journal_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Runs entry analyses against the configured provider.
    pub orchestrator: Arc<AnalysisOrchestrator>,
    /// Provider settings reported by `/health`.
    pub analyzer: Arc<AnalyzerProfile>,
    /// Cancelled when the server begins shutting down so in-flight analyses
    /// stop waiting on the provider.
    pub shutdown: CancellationToken,
}
