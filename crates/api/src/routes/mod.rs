pub mod actions;
pub mod catalog;
pub mod facets;
pub mod health;
pub mod views;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /actions                       filtered actions with highlight ranges
/// /actions/by-year               year groups (preview + hidden count)
/// /actions/{slug}                one action
///
/// /facets                        options of every dimension
/// /facets/{dimension}            options of one dimension
///
/// /chart                         actions per year
/// /map                           map markers and per-country counts
/// /groups/related                organising groups behind the result
///
/// /catalog/refresh               reload the record source (POST)
/// ```
///
/// Every GET route reads the filter state from the query string.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/actions", actions::router())
        .nest("/facets", facets::router())
        .nest("/catalog", catalog::router())
        .merge(views::router())
}
