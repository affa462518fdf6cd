//! On-demand catalog reload.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::background::catalog_refresh;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/catalog/refresh
///
/// Reload the record source now instead of waiting for the next scheduled
/// refresh. A failing source answers 503 and leaves the current catalog in
/// place.
pub async fn refresh_catalog(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = catalog_refresh::reload(&state).await?;

    Ok(Json(DataResponse { data: summary }))
}
