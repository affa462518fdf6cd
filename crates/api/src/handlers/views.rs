//! Chart, map and related-group views over the filtered actions.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::response::Response;
use chrono::{Datelike, Utc};
use serde::Serialize;
use solidarity_core::projection::{self, MapMarker, YearBin};

use crate::error::AppResult;
use crate::middleware::filter::FilterQuery;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Serialize)]
struct Chart {
    total: usize,
    bins: Vec<YearBin>,
}

#[derive(Serialize)]
struct Map {
    markers: Vec<MapMarker>,
    country_counts: BTreeMap<String, usize>,
}

/// GET /api/v1/chart
///
/// Matching actions per year, zero-filled through the current year.
pub async fn chart(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let actions = explorer.filter(&filter).actions();

    Ok(DataResponse::render(Chart {
        total: actions.len(),
        bins: projection::year_histogram(&actions, Utc::now().year()),
    }))
}

/// GET /api/v1/map
pub async fn map(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let actions = explorer.filter(&filter).actions();

    Ok(DataResponse::render(Map {
        markers: projection::map_markers(explorer.catalog(), &actions),
        country_counts: projection::country_counts(explorer.catalog(), &actions),
    }))
}

/// GET /api/v1/groups/related
///
/// Organising groups behind the matching actions, in first-seen order.
pub async fn related_groups(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let actions = explorer.filter(&filter).actions();
    let groups = projection::related_groups(explorer.catalog(), &actions);

    Ok(DataResponse::render(groups))
}
