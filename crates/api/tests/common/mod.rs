#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use solidarity_core::catalog::{Action, FacetRecords, FacetValue};
use solidarity_core::dimension::Dimension;
use solidarity_core::explorer::Explorer;
use solidarity_store::{RecordSet, RecordSource, StaticSource};
use tower::ServiceExt;

use solidarity_api::config::ServerConfig;
use solidarity_api::router::build_app_router;
use solidarity_api::state::{AppState, CatalogHandle};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        snapshot_path: PathBuf::from("data/snapshot.json"),
        catalog_ttl_secs: 60,
    }
}

/// Five actions across France and Germany, 2019 to 2021.
///
/// `a3` is undated-by-mistake (`"unknown"`), `a4` has its own coordinate,
/// `a5` references a group that no longer exists.
pub fn fixture_records() -> RecordSet {
    let actions = vec![
        Action::new("a1", "port-blockade", "2019-05-01", "Port blockade")
            .with_summary("Dockers refused to unload the ship in solidarity.")
            .with_foreign_keys(Dimension::Country, &["recFR"])
            .with_foreign_keys(Dimension::Type, &["recBlockade"])
            .with_foreign_keys(Dimension::Group, &["recDockers"]),
        Action::new("a2", "warehouse-arrests", "2020-02-11", "Warehouse arrests")
            .with_summary("Organisers arrested outside the warehouse.")
            .with_foreign_keys(Dimension::Country, &["recFR"])
            .with_foreign_keys(Dimension::Type, &["recArrest"]),
        Action::new("a3", "undated-walkout", "unknown", "Undated walkout")
            .with_foreign_keys(Dimension::Country, &["recDE"]),
        Action::new("a4", "berlin-arrest", "2020-09-30", "Berlin arrest")
            .with_summary("Solidarity vigil ended with one arrest.")
            .with_coordinate(52.52, 13.40)
            .with_foreign_keys(Dimension::Country, &["recDE"])
            .with_foreign_keys(Dimension::Type, &["recArrest"])
            .with_foreign_keys(Dimension::Group, &["recStudents"]),
        Action::new("a5", "coffee-boycott", "2021-01-15", "Coffee boycott")
            .with_foreign_keys(Dimension::Country, &["recDE"])
            .with_foreign_keys(Dimension::Group, &["recGone", "recDockers"]),
    ];
    let facets = FacetRecords::default()
        .with(
            Dimension::Country,
            vec![
                FacetValue::new("recFR", "France")
                    .with_slug("fr")
                    .with_iso_code("FR")
                    .with_centroid(46.2, 2.2),
                FacetValue::new("recDE", "Germany")
                    .with_slug("de")
                    .with_iso_code("DE")
                    .with_centroid(51.1, 10.4),
            ],
        )
        .with(
            Dimension::Type,
            vec![
                FacetValue::new("recArrest", "Arrest"),
                FacetValue::new("recBlockade", "Blockade"),
                FacetValue::new("recBoycott", "Boycott"),
            ],
        )
        .with(
            Dimension::Group,
            vec![
                FacetValue::new("recDockers", "Dockers Union"),
                FacetValue::new("recStudents", "Students for Workers"),
            ],
        );
    RecordSet { actions, facets }
}

/// App state serving the fixture catalog, reloading from `source`.
pub fn test_state(source: Arc<dyn RecordSource>) -> AppState {
    let explorer = Explorer::new(fixture_records().into_catalog());
    AppState {
        config: Arc::new(test_config()),
        catalog: Arc::new(CatalogHandle::new(explorer)),
        source,
    }
}

/// Build the full application router serving the fixture catalog.
pub fn build_test_app() -> Router {
    let state = test_state(Arc::new(StaticSource::new(fixture_records())));
    build_app_router(state, &test_config())
}

/// Build the router around a prepared state.
pub fn build_app_with(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

pub async fn get(app: Router, uri: &str) -> Response {
    request(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    request(app, Method::POST, uri).await
}

async fn request(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `slug` of every action in a JSON array.
pub fn slugs(actions: &serde_json::Value) -> Vec<String> {
    actions
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["slug"].as_str().unwrap().to_string())
        .collect()
}
