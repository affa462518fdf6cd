//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get};
use solidarity_api::error::AppError;
use solidarity_api::state::{AppState, CatalogHandle};
use solidarity_store::StaticSource;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with catalog details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_loaded_catalog() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["generation"].as_u64().unwrap() > 0);
    assert_eq!(json["actions"], 5);
    assert_eq!(json["skipped_fields"], 0);
}

// ---------------------------------------------------------------------------
// Test: before the first load, health is degraded and lists are 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_catalog_is_degraded() {
    let state = AppState {
        config: Arc::new(common::test_config()),
        catalog: Arc::new(CatalogHandle::empty()),
        source: Arc::new(StaticSource::default()),
    };
    assert_matches!(state.catalog.current(), Err(AppError::CatalogUnavailable));

    let response = get(common::build_app_with(state.clone()), "/health").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert!(json["generation"].is_null());
    assert_eq!(json["actions"], 0);

    let response = get(common::build_app_with(state), "/api/v1/actions").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // MakeRequestUuid produces hyphenated UUIDs.
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
