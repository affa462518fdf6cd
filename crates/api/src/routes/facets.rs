use axum::routing::get;
use axum::Router;

use crate::handlers::facets;
use crate::state::AppState;

/// Facet routes mounted at `/facets`.
///
/// ```text
/// GET /              -> list_facets
/// GET /{dimension}   -> get_facet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(facets::list_facets))
        .route("/{dimension}", get(facets::get_facet))
}
