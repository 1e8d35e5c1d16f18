//! Route definitions for journal entries.
//!
//! Registered under `/entries`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::entries;
use crate::state::AppState;

/// Entry routes, registered as `/entries`.
///
/// ```text
/// GET    /                 list_entries
/// POST   /                 create_entry
/// DELETE /                 delete_all_entries
/// GET    /{id}             get_entry
/// PATCH  /{id}             update_entry
/// DELETE /{id}             delete_entry
/// POST   /{id}/analyze     analyze_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(entries::list_entries)
                .post(entries::create_entry)
                .delete(entries::delete_all_entries),
        )
        .route(
            "/{id}",
            get(entries::get_entry)
                .patch(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/{id}/analyze", post(entries::analyze_entry))
}
