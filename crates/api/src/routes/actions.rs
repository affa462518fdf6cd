//! Route definitions for the action list, mounted at `/actions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// ```text
/// GET /              -> list_actions
/// GET /by-year       -> list_actions_by_year
/// GET /{slug}        -> get_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actions::list_actions))
        .route("/by-year", get(actions::list_actions_by_year))
        .route("/{slug}", get(actions::get_action))
}
