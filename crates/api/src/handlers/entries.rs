//! Handlers for journal entries and their analysis.
//!
//! Entries are validated by [`Entry::new`] before they are stored, so every
//! handler below works with entries that already satisfy the field rules.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use journal_core::entry::{Entry, EntryPatch};
use journal_core::error::CoreError;
use journal_core::types::EntryId;
use journal_db::repositories::EntryRepo;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Default page size for entry listings.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/* --------------------------------------------------------------------------
Request / response types
-------------------------------------------------------------------------- */

/// Body of `POST /entries`.
#[derive(Debug, Deserialize)]
pub struct CreateEntry {
    pub work: String,
    pub struggle: String,
    pub intention: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListEntriesParams {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: usize,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch an entry by id or return 404.
async fn ensure_entry(pool: &journal_db::DbPool, id: EntryId) -> AppResult<Entry> {
    EntryRepo::find_by_id(pool, id).await.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Entry",
        id,
    }))
}

/* --------------------------------------------------------------------------
Entry CRUD
-------------------------------------------------------------------------- */

/// POST /entries
///
/// Validate, normalize, and store a new entry.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(input): Json<CreateEntry>,
) -> AppResult<impl IntoResponse> {
    let entry = Entry::new(&input.work, &input.struggle, &input.intention).map_err(CoreError::from)?;
    let entry = EntryRepo::create(&state.pool, entry).await;

    tracing::info!(entry_id = %entry.id(), "Entry created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /entries
///
/// List entries, newest first, with the total count.
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListEntriesParams>,
) -> AppResult<impl IntoResponse> {
    params
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let entries = EntryRepo::list(&state.pool, limit, offset).await;
    let total = EntryRepo::count(&state.pool).await;

    Ok(Json(PageResponse {
        data: entries,
        total,
        limit,
        offset,
    }))
}

/// GET /entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> AppResult<impl IntoResponse> {
    let entry = ensure_entry(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// PATCH /entries/{id}
///
/// Update some of an entry's fields. Present fields are held to the same
/// rules as on creation; `updated_at` only moves when a value changes.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
    Json(patch): Json<EntryPatch>,
) -> AppResult<impl IntoResponse> {
    if patch.is_empty() {
        return Err(AppError::BadRequest(
            "At least one of work, struggle, or intention must be provided".into(),
        ));
    }

    let entry = EntryRepo::update(&state.pool, id, &patch)
        .await
        .map_err(CoreError::from)?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Entry",
            id,
        }))?;

    tracing::info!(entry_id = %id, "Entry updated");

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /entries/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> AppResult<StatusCode> {
    if EntryRepo::delete(&state.pool, id).await {
        tracing::info!(entry_id = %id, "Entry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Entry",
            id,
        }))
    }
}

/// DELETE /entries
pub async fn delete_all_entries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let deleted = EntryRepo::delete_all(&state.pool).await;
    tracing::info!(deleted, "All entries deleted");
    Ok(Json(DataResponse {
        data: DeletedCount { deleted },
    }))
}

/* --------------------------------------------------------------------------
Analysis
-------------------------------------------------------------------------- */

/// POST /entries/{id}/analyze
///
/// Run the provider analysis for a stored entry. The result is returned
/// but not stored, and a failed analysis leaves the entry as it was.
pub async fn analyze_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> AppResult<impl IntoResponse> {
    let entry = ensure_entry(&state.pool, id).await?;

    let analysis = state
        .orchestrator
        .analyze_with_cancel(&entry, &state.shutdown)
        .await?;

    Ok(Json(DataResponse { data: analysis }))
}
