//! Integration tests for the chart, map and related-group views.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /api/v1/chart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chart_is_zero_filled_through_current_year() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/chart").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let bins = json["data"]["bins"].as_array().unwrap();

    assert_eq!(json["data"]["total"], 5);
    assert_eq!(bins.first().unwrap()["year"], 2000);
    assert_eq!(
        bins.last().unwrap()["year"].as_i64().unwrap(),
        i64::from(Utc::now().year())
    );

    let bin = |year: i64| bins.iter().find(|b| b["year"] == year).unwrap()["count"].clone();
    assert_eq!(bin(2001), 0);
    assert_eq!(bin(2019), 1);
    assert_eq!(bin(2020), 2);

    // The undated action is counted in the total but has no bin.
    let binned: u64 = bins.iter().map(|b| b["count"].as_u64().unwrap()).sum();
    assert_eq!(binned, 4);
}

#[tokio::test]
async fn chart_follows_the_filter() {
    let app = common::build_test_app();
    let json = body_json(get(app, "/api/v1/chart?type=Arrest").await).await;

    let binned: u64 = json["data"]["bins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["count"].as_u64().unwrap())
        .sum();
    assert_eq!(binned, 2);
}

// ---------------------------------------------------------------------------
// Test: GET /api/v1/map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn map_pins_located_actions_and_gathers_the_rest_per_country() {
    let app = common::build_test_app();
    let json = body_json(get(app, "/api/v1/map").await).await;

    let markers = json["data"]["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 3);

    assert_eq!(markers[0]["kind"], "action");
    assert_eq!(markers[0]["slug"], "berlin-arrest");

    assert_eq!(markers[1]["kind"], "country");
    assert_eq!(markers[1]["iso_code"], "FR");
    assert_eq!(markers[1]["action_ids"], serde_json::json!(["a1", "a2"]));

    assert_eq!(markers[2]["iso_code"], "DE");
    assert_eq!(markers[2]["action_ids"], serde_json::json!(["a3", "a5"]));

    assert_eq!(json["data"]["country_counts"], serde_json::json!({ "DE": 3, "FR": 2 }));
}

// ---------------------------------------------------------------------------
// Test: GET /api/v1/groups/related
// ---------------------------------------------------------------------------

#[tokio::test]
async fn related_groups_in_first_seen_order() {
    let app = common::build_test_app();
    let json = body_json(get(app, "/api/v1/groups/related").await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dockers Union", "Students for Workers"]);

    let app = common::build_test_app();
    let json = body_json(get(app, "/api/v1/groups/related?country=de").await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Students for Workers", "Dockers Union"]);
}
