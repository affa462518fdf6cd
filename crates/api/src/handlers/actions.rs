//! Handlers for the filtered action list.
//!
//! Every list endpoint reads the filter state from the query string through
//! [`FilterQuery`] and answers from the catalog snapshot current at the start
//! of the request.

use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use solidarity_core::catalog::Action;
use solidarity_core::projection::{self, YearGroup};
use solidarity_core::query::FilteredAction;
use solidarity_core::types::Year;
use solidarity_core::url_state;

use crate::error::AppResult;
use crate::middleware::filter::FilterQuery;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ActionList<'a> {
    total: usize,
    has_filters: bool,
    /// Canonical query string of the applied filter state.
    query: String,
    actions: &'a [FilteredAction<'a>],
}

#[derive(Serialize)]
struct YearGroupView<'a> {
    year: Year,
    total: usize,
    hidden_count: usize,
    preview: &'a [&'a Action],
    actions: &'a [&'a Action],
}

impl<'a> From<&'a YearGroup<'a>> for YearGroupView<'a> {
    fn from(group: &'a YearGroup<'a>) -> Self {
        Self {
            year: group.year,
            total: group.actions.len(),
            hidden_count: group.hidden_count(),
            preview: group.preview(),
            actions: &group.actions,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/actions
///
/// Actions matching the filter in catalog order. Free-text queries attach
/// highlight ranges to each action.
pub async fn list_actions(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let filtered = explorer.filter(&filter);

    tracing::debug!(
        total = filtered.len(),
        has_filters = filtered.has_filters(),
        "Listed actions"
    );

    Ok(DataResponse::render(ActionList {
        total: filtered.len(),
        has_filters: filtered.has_filters(),
        query: url_state::encode(&filter),
        actions: filtered.entries(),
    }))
}

/// GET /api/v1/actions/by-year
///
/// Matching actions grouped by calendar year, newest first. Each group
/// carries a short preview and the number of actions beyond it.
pub async fn list_actions_by_year(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let actions = explorer.filter(&filter).actions();
    let groups = projection::group_by_year(&actions);
    let views: Vec<YearGroupView<'_>> = groups.iter().map(YearGroupView::from).collect();

    Ok(DataResponse::render(views))
}

/// GET /api/v1/actions/{slug}
pub async fn get_action(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let action = explorer.action_by_slug(&slug)?;

    Ok(DataResponse::render(action))
}
