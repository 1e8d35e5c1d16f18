use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use journal_analyzer::retry::{RetryConfig, RetryingAnalyzer};
use journal_analyzer::{Analyzer, AzureOpenAiClient, AzureOpenAiConfig};
use journal_pipeline::AnalysisOrchestrator;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use journal_api::config::{AnalyzerProfile, ServerConfig};
use journal_api::router::build_app_router;
use journal_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "journal_api=debug,journal_pipeline=debug,journal_analyzer=debug,tower_http=debug".into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // Missing provider settings stop startup instead of failing every analysis.
    let analyzer_config = AzureOpenAiConfig::from_env()
        .unwrap_or_else(|e| panic!("Invalid analyzer configuration: {e}"));
    tracing::info!(
        deployment = %analyzer_config.deployment,
        timeout_secs = analyzer_config.request_timeout.as_secs(),
        max_retries = analyzer_config.max_retries,
        "Loaded analyzer configuration"
    );

    let retry = RetryConfig {
        max_retries: analyzer_config.max_retries,
        ..RetryConfig::default()
    };
    let analysis_budget = retry.worst_case(analyzer_config.request_timeout);
    config
        .check_analysis_budget(analysis_budget)
        .unwrap_or_else(|e| panic!("Invalid timeout configuration: {e}"));
    let profile = AnalyzerProfile::new(&analyzer_config, &retry);

    // --- Analyzer ---
    let client = AzureOpenAiClient::new(analyzer_config.clone())
        .unwrap_or_else(|e| panic!("Failed to build analyzer client: {e}"));
    let analyzer: Arc<dyn Analyzer> = if retry.max_retries > 0 {
        tracing::info!(
            max_retries = retry.max_retries,
            worst_case_ms = analysis_budget.as_millis() as u64,
            "Analyzer retries enabled"
        );
        Arc::new(RetryingAnalyzer::new(client, retry))
    } else {
        Arc::new(client)
    };
    let orchestrator = AnalysisOrchestrator::new(analyzer)
        .with_max_output_tokens(analyzer_config.max_output_tokens);

    // --- Store ---
    let pool = journal_db::create_pool();
    tracing::info!("Entry store created");

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(orchestrator),
        analyzer: Arc::new(profile),
        shutdown: shutdown.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .into_future();
    let drain_limit = Duration::from_secs(config.shutdown_timeout_secs);
    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(drain_limit).await;
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Connections did not drain in time, forcing shutdown"
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Cancels `shutdown`
/// so in-flight analyses stop waiting on the provider.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    shutdown.cancel();
}
