//! Derived views over the filtered actions, mounted at the API root.

use axum::routing::get;
use axum::Router;

use crate::handlers::views;
use crate::state::AppState;

/// ```text
/// GET /chart           -> chart
/// GET /map             -> map
/// GET /groups/related  -> related_groups
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chart", get(views::chart))
        .route("/map", get(views::map))
        .route("/groups/related", get(views::related_groups))
}
