use axum::routing::post;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog maintenance routes mounted at `/catalog`.
///
/// ```text
/// POST /refresh      -> refresh_catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/refresh", post(catalog::refresh_catalog))
}
