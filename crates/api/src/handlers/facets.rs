//! Handlers for facet options and their "count if added" numbers.

use axum::extract::{Path, State};
use axum::response::Response;
use serde::Serialize;
use solidarity_core::dimension::Dimension;
use solidarity_core::explorer::Explorer;
use solidarity_core::facets::FacetOption;
use solidarity_core::filter_state::FilterState;

use crate::error::{AppError, AppResult};
use crate::middleware::filter::FilterQuery;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Serialize)]
struct FacetGroup {
    dimension: Dimension,
    /// URL parameter that selects values of this dimension.
    key: &'static str,
    label: &'static str,
    selected_count: usize,
    options: Vec<FacetOption>,
}

#[derive(Serialize)]
struct FacetList {
    total: usize,
    has_filters: bool,
    facets: Vec<FacetGroup>,
}

fn facet_group(explorer: &Explorer, dimension: Dimension, filter: &FilterState) -> FacetGroup {
    FacetGroup {
        dimension,
        key: dimension.url_key(),
        label: dimension.label(),
        selected_count: filter.selected(dimension).len(),
        options: explorer.facet_options(dimension, filter),
    }
}

/// GET /api/v1/facets
///
/// Options of every dimension, in display order.
pub async fn list_facets(
    State(state): State<AppState>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let explorer = state.catalog.current()?;
    let facets = Dimension::ALL
        .into_iter()
        .map(|dimension| facet_group(&explorer, dimension, &filter))
        .collect();

    Ok(DataResponse::render(FacetList {
        total: explorer.count(&filter),
        has_filters: explorer.has_filters(&filter),
        facets,
    }))
}

/// GET /api/v1/facets/{dimension}
///
/// Options of one dimension, addressed by its URL key (`country`, `type`, ...).
pub async fn get_facet(
    State(state): State<AppState>,
    Path(key): Path<String>,
    FilterQuery(filter): FilterQuery,
) -> AppResult<Response> {
    let dimension = Dimension::from_url_key(&key)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown facet dimension '{key}'")))?;
    let explorer = state.catalog.current()?;

    Ok(DataResponse::render(facet_group(&explorer, dimension, &filter)))
}
