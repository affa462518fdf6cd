use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` once a catalog is loaded, `degraded` before that.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Generation of the catalog being served.
    pub generation: Option<u64>,
    /// Actions in the catalog being served.
    pub actions: usize,
    /// Field values left out of the search index.
    pub skipped_fields: usize,
}

/// GET /health -- returns service and catalog health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let explorer = state.catalog.current().ok();

    Json(HealthResponse {
        status: if explorer.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        generation: explorer.as_ref().map(|e| e.generation()),
        actions: explorer.as_ref().map_or(0, |e| e.catalog().len()),
        skipped_fields: explorer
            .as_ref()
            .map_or(0, |e| e.index().skipped_fields().len()),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
