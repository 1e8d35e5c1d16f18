pub mod entries;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /entries                         list, create, delete all
/// /entries/{id}                    get, patch, delete
/// /entries/{id}/analyze            run analysis (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/entries", entries::router())
}
