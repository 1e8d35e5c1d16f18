use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use journal_analyzer::AnalyzerError;
use journal_core::error::CoreError;
use journal_pipeline::AnalysisError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`AnalysisError`] for provider
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `journal_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The entry could not be analyzed. The entry itself is unaffected.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::InvalidEntry(err) => {
                    field = Some(err.field().as_str());
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Analysis errors ---
            AppError::Analysis(err) => classify_analysis_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(field) = field {
            body["field"] = json!(field);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an analysis failure into an HTTP status, error code, and message.
///
/// - Missing provider configuration maps to 503.
/// - A provider timeout maps to 504.
/// - Every other provider-side failure maps to 502 with a sanitized message;
///   the details are logged instead.
/// - A cancelled analysis (server shutting down) maps to 503.
fn classify_analysis_error(err: &AnalysisError) -> (StatusCode, &'static str, String) {
    match err {
        AnalysisError::Client(client) => match client {
            AnalyzerError::Configuration(cfg) => {
                tracing::error!(error = %cfg, "Analyzer is not configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ANALYZER_NOT_CONFIGURED",
                    "Analysis is not configured on this server".to_string(),
                )
            }
            AnalyzerError::Timeout { after } => (
                StatusCode::GATEWAY_TIMEOUT,
                "ANALYSIS_TIMEOUT",
                format!(
                    "Analysis unavailable: provider did not respond within {}ms",
                    after.as_millis()
                ),
            ),
            AnalyzerError::EmptyResponse => (
                StatusCode::BAD_GATEWAY,
                "ANALYSIS_EMPTY_RESPONSE",
                "Analysis unavailable: provider returned no content".to_string(),
            ),
            other => {
                tracing::error!(error = %other, "Analyzer provider call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_UNAVAILABLE",
                    "Analysis unavailable: provider request failed".to_string(),
                )
            }
        },
        AnalysisError::Malformed { reason, excerpt } => {
            tracing::warn!(%reason, %excerpt, "Malformed analysis payload");
            (
                StatusCode::BAD_GATEWAY,
                "ANALYSIS_MALFORMED",
                format!("Analysis unavailable: provider returned malformed output: {excerpt}"),
            )
        }
        AnalysisError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "ANALYSIS_CANCELLED",
            "Analysis cancelled: server is shutting down".to_string(),
        ),
    }
}
