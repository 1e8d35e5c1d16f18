//! `GET /health`: store responsiveness plus the analyzer setup in use.
//!
//! The provider is never called from here; only its configured profile is
//! reported.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::AnalyzerProfile;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` when the store lock is stuck, or `shutting_down`.
    pub status: &'static str,
    pub version: &'static str,
    pub store_healthy: bool,
    /// False once shutdown has begun and new analyses would be cancelled.
    pub accepting_analyses: bool,
    /// Whether the HTTP timeout outlasts the slowest possible analysis.
    pub timeout_covers_analysis: bool,
    pub analyzer: AnalyzerProfile,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = journal_db::health_check(&state.pool).await.is_ok();
    let accepting_analyses = !state.shutdown.is_cancelled();
    let analyzer = AnalyzerProfile::clone(&state.analyzer);
    let timeout_covers_analysis = state
        .config
        .check_analysis_budget(std::time::Duration::from_millis(analyzer.worst_case_ms))
        .is_ok();

    let status = match (accepting_analyses, store_healthy) {
        (false, _) => "shutting_down",
        (true, false) => "degraded",
        (true, true) => "ok",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        accepting_analyses,
        timeout_covers_analysis,
        analyzer,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
