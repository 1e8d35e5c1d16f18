#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use journal_analyzer::retry::RetryConfig;
use journal_analyzer::{AnalysisRequest, Analyzer, AnalyzerError, AzureOpenAiConfig};
use journal_db::DbPool;
use journal_pipeline::AnalysisOrchestrator;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use journal_api::config::{AnalyzerProfile, ServerConfig};
use journal_api::router::build_app_router;
use journal_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and the production 60-second
/// request timeout, which covers one 30-second analyzer attempt.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 60,
        shutdown_timeout_secs: 30,
    }
}

/// Profile of a single-attempt deployment named `journal-test`.
pub fn test_profile() -> AnalyzerProfile {
    let config = AzureOpenAiConfig::new("https://journal.example", "journal-test", "test-key");
    let retry = RetryConfig {
        max_retries: 0,
        ..RetryConfig::default()
    };
    AnalyzerProfile::new(&config, &retry)
}

/// Analyzer double that replays a fixed outcome and counts calls.
pub struct StubAnalyzer {
    outcome: Box<dyn Fn() -> Result<String, AnalyzerError> + Send + Sync>,
    pub calls: Mutex<usize>,
}

impl StubAnalyzer {
    pub fn replying(body: &str) -> Arc<Self> {
        let body = body.to_string();
        Self::failing_with(move || Ok(body.clone()))
    }

    pub fn failing_with(
        outcome: impl Fn() -> Result<String, AnalyzerError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            outcome: Box::new(outcome),
            calls: Mutex::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze_raw(&self, _request: &AnalysisRequest) -> Result<String, AnalyzerError> {
        *self.calls.lock().unwrap() += 1;
        (self.outcome)()
    }
}

/// Build the full application router around `pool` and `analyzer`.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: DbPool, analyzer: Arc<dyn Analyzer>) -> Router {
    build_test_app_with(pool, analyzer, CancellationToken::new())
}

/// Like [`build_test_app`] with a caller-held shutdown token.
pub fn build_test_app_with(
    pool: DbPool,
    analyzer: Arc<dyn Analyzer>,
    shutdown: CancellationToken,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(AnalysisOrchestrator::new(analyzer)),
        analyzer: Arc::new(test_profile()),
        shutdown,
    };
    build_app_router(state, &config)
}

/// App with a fresh store and an analyzer that always answers `{}`.
pub fn default_app() -> (Router, DbPool) {
    let pool = journal_db::create_pool();
    let app = build_test_app(pool.clone(), StubAnalyzer::replying("{}"));
    (app, pool)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
