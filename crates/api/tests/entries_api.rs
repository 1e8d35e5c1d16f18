//! Integration tests for the `/api/v1/entries` endpoints, including analysis.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, default_app, delete, get, patch_json,
    post_empty, post_json, StubAnalyzer,
};
use journal_analyzer::AnalyzerError;
use journal_db::repositories::EntryRepo;
use serde_json::json;

fn sample_entry() -> serde_json::Value {
    json!({
        "work": "Studied APIs",
        "struggle": "async syntax",
        "intention": "practice queries",
    })
}

/// Create an entry through the API and return its JSON representation.
async fn create(app: axum::Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, "/api/v1/entries", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Test: create trims fields and assigns identity and timestamps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_entry_normalizes_and_returns_201() {
    let (app, pool) = default_app();

    let entry = create(
        app,
        json!({
            "work": "  Studied APIs  ",
            "struggle": "async syntax",
            "intention": "\tpractice queries\n",
        }),
    )
    .await;

    assert_eq!(entry["work"], "Studied APIs");
    assert_eq!(entry["intention"], "practice queries");
    assert_eq!(entry["schema_version"], 1);
    assert!(entry["id"].is_string());
    assert_eq!(entry["created_at"], entry["updated_at"]);
    assert_eq!(EntryRepo::count(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Test: validation failures name the offending field
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_entry_rejects_blank_field() {
    let (app, pool) = default_app();

    let response = post_json(
        app,
        "/api/v1/entries",
        json!({"work": "x", "struggle": "   ", "intention": "y"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "struggle");
    assert_eq!(EntryRepo::count(&pool).await, 0);
}

#[tokio::test]
async fn create_entry_enforces_length_limit_after_trim() {
    let (app, _) = default_app();

    // 256 characters of content plus padding is accepted.
    let padded = format!("  {}  ", "a".repeat(256));
    let entry = create(
        app.clone(),
        json!({"work": padded, "struggle": "s", "intention": "i"}),
    )
    .await;
    assert_eq!(entry["work"].as_str().unwrap().chars().count(), 256);

    let response = post_json(
        app,
        "/api/v1/entries",
        json!({"work": "w", "struggle": "s", "intention": "é".repeat(257)}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "intention");
}

// ---------------------------------------------------------------------------
// Test: read, list, update, delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_entry_round_trips() {
    let (app, _) = default_app();
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = get(app, &format!("/api/v1/entries/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], created);
}

#[tokio::test]
async fn get_unknown_entry_returns_404() {
    let (app, _) = default_app();

    let response = get(app, &format!("/api/v1/entries/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_entries_newest_first_with_paging() {
    let (app, _) = default_app();
    for i in 0..3 {
        create(
            app.clone(),
            json!({"work": format!("work {i}"), "struggle": "s", "intention": "i"}),
        )
        .await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let response = get(app.clone(), "/api/v1/entries?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["offset"], 0);
    let data = page["data"].clone();
    let works: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["work"].as_str().unwrap())
        .collect();
    assert_eq!(works, vec!["work 2", "work 1"]);

    let response = get(app, "/api/v1/entries?limit=2&offset=2").await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["work"], "work 0");
}

#[tokio::test]
async fn list_entries_rejects_out_of_range_limit() {
    let (app, _) = default_app();

    let response = get(app, "/api/v1/entries?limit=0").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn patch_entry_updates_only_given_fields() {
    let (app, _) = default_app();
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = patch_json(
        app,
        &format!("/api/v1/entries/{id}"),
        json!({"struggle": "  lifetimes  "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["struggle"], "lifetimes");
    assert_eq!(updated["work"], created["work"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn invalid_patch_leaves_entry_unchanged() {
    let (app, _) = default_app();
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/entries/{id}");

    let response = patch_json(
        app.clone(),
        &uri,
        json!({"work": "new work", "intention": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "intention");

    let current = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(current, created);
}

#[tokio::test]
async fn empty_patch_is_rejected() {
    let (app, _) = default_app();
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = patch_json(app, &format!("/api/v1/entries/{id}"), json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn delete_entry_then_404() {
    let (app, pool) = default_app();
    let created = create(app.clone(), sample_entry()).await;
    let uri = format!("/api/v1/entries/{}", created["id"].as_str().unwrap());

    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app.clone(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(EntryRepo::count(&pool).await, 0);
}

#[tokio::test]
async fn delete_all_reports_count() {
    let (app, pool) = default_app();
    create(app.clone(), sample_entry()).await;
    create(app.clone(), sample_entry()).await;

    let response = delete(app, "/api/v1/entries").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], 2);
    assert_eq!(EntryRepo::count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_entry_returns_result() {
    let pool = journal_db::create_pool();
    let analyzer = StubAnalyzer::replying(
        r#"{"sentiment":"positive","summary":"Made progress learning APIs. Async syntax was tricky.","topics":["APIs","async"]}"#,
    );
    let app = build_test_app(pool, analyzer.clone());
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_empty(app, &format!("/api/v1/entries/{id}/analyze")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await["data"].clone();
    assert_eq!(result["entry_id"], id);
    assert_eq!(result["sentiment"], "positive");
    assert_eq!(
        result["summary"],
        "Made progress learning APIs. Async syntax was tricky."
    );
    assert_eq!(result["topics"], json!(["APIs", "async"]));
    assert!(result["created_at"].is_string());
    assert_eq!(analyzer.call_count(), 1);
}

#[tokio::test]
async fn analyze_coerces_unexpected_fields() {
    let pool = journal_db::create_pool();
    let app = build_test_app(
        pool,
        StubAnalyzer::replying(r#"{"sentiment": "great", "summary": 7, "topics": "x"}"#),
    );
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_empty(app, &format!("/api/v1/entries/{id}/analyze")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await["data"].clone();
    assert_eq!(result["sentiment"], "neutral");
    assert_eq!(result["summary"], "");
    assert_eq!(result["topics"], json!([]));
}

#[tokio::test]
async fn analyze_unknown_entry_skips_provider() {
    let pool = journal_db::create_pool();
    let analyzer = StubAnalyzer::replying("{}");
    let app = build_test_app(pool, analyzer.clone());

    let response = post_empty(
        app,
        &format!("/api/v1/entries/{}/analyze", uuid::Uuid::new_v4()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(analyzer.call_count(), 0);
}

#[tokio::test]
async fn analyze_empty_response_is_502_and_entry_unchanged() {
    let pool = journal_db::create_pool();
    let app = build_test_app(
        pool,
        StubAnalyzer::failing_with(|| Err(AnalyzerError::EmptyResponse)),
    );
    let created = create(app.clone(), sample_entry()).await;
    let uri = format!("/api/v1/entries/{}", created["id"].as_str().unwrap());

    let response = post_empty(app.clone(), &format!("{uri}/analyze")).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "ANALYSIS_EMPTY_RESPONSE");
    let current = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(current, created);
}

#[tokio::test]
async fn analyze_timeout_is_504() {
    let pool = journal_db::create_pool();
    let analyzer = StubAnalyzer::failing_with(|| {
        Err(AnalyzerError::Timeout {
            after: Duration::from_secs(30),
        })
    });
    let app = build_test_app(pool, analyzer.clone());
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_empty(app, &format!("/api/v1/entries/{id}/analyze")).await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ANALYSIS_TIMEOUT");
    assert!(json["error"].as_str().unwrap().contains("30000ms"));
    assert_eq!(analyzer.call_count(), 1);
}

#[tokio::test]
async fn analyze_malformed_output_is_502() {
    let pool = journal_db::create_pool();
    let app = build_test_app(pool, StubAnalyzer::replying("[1, 2, 3]"));
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();

    let response = post_empty(app, &format!("/api/v1/entries/{id}/analyze")).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "ANALYSIS_MALFORMED");
}

#[tokio::test]
async fn analyze_during_shutdown_is_cancelled() {
    let shutdown = tokio_util::sync::CancellationToken::new();
    let analyzer = StubAnalyzer::replying("{}");
    let app = build_test_app_with(journal_db::create_pool(), analyzer, shutdown.clone());
    let created = create(app.clone(), sample_entry()).await;
    let id = created["id"].as_str().unwrap();
    shutdown.cancel();

    let response = post_empty(app, &format!("/api/v1/entries/{id}/analyze")).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "ANALYSIS_CANCELLED");
}
