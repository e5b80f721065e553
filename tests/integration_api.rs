//! End-to-end API tests over a preset projection.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use ratepayer_impact::api::{AppState, router};
use ratepayer_impact::config::ProjectionConfig;
use ratepayer_impact::model::summary::calculate_summary_stats;

fn state_for(preset: &str) -> Arc<AppState> {
    let config = ProjectionConfig::from_preset(preset).expect("preset should load");
    let trajectories = config.project().expect("preset should project");
    let summary = calculate_summary_stats(&trajectories, &config.utility);
    Arc::new(AppState {
        config,
        trajectories,
        summary,
    })
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let resp = router(state).oneshot(req).await.expect("router should respond");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = serde_json::from_slice(&body).expect("body should be JSON");
    (status, json)
}

#[tokio::test]
async fn summary_matches_trajectory_endpoint() {
    let state = state_for("pso-oklahoma");
    let (status, summary) = get(Arc::clone(&state), "/summary").await;
    assert_eq!(status, StatusCode::OK);

    let (status, firm) = get(state, "/trajectories/unoptimized").await;
    assert_eq!(status, StatusCode::OK);
    let points = firm["points"].as_array().expect("points array");
    assert_eq!(
        points.last().map(|p| p["monthly_bill"].clone()),
        Some(summary["final_year_bills"]["unoptimized"].clone())
    );
}

#[tokio::test]
async fn served_config_deserializes_back() {
    let state = state_for("dominion-virginia");
    let (status, json) = get(Arc::clone(&state), "/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["utility"]["market_type"], "pjm");
    assert_eq!(json["tariff"]["demand_charge_type"], "TOU_PEAK_NCP");

    let served: ProjectionConfig =
        serde_json::from_value(json).expect("served config should deserialize");
    assert_eq!(served.tariff, state.config.tariff);
    assert_eq!(served.projection, state.config.projection);
    assert_eq!(
        served.utility.total_customers(),
        state.config.utility.total_customers()
    );
}

#[tokio::test]
async fn trajectory_points_flag_interconnection() {
    let (_, json) = get(state_for("default"), "/trajectories/dispatchable").await;
    let points = json["points"].as_array().expect("points array");
    assert_eq!(points[1]["dc_online"], false);
    assert_eq!(points[2]["dc_online"], true);
    assert_eq!(points[0]["year"], 2025);
}

#[tokio::test]
async fn open_ended_range_filters_from_start() {
    let (status, json) = get(state_for("default"), "/trajectories?from=2033").await;
    assert_eq!(status, StatusCode::OK);
    let years: Vec<_> = json
        .as_array()
        .expect("rows array")
        .iter()
        .map(|r| r["year"].as_u64())
        .collect();
    assert_eq!(years, vec![Some(2033), Some(2034), Some(2035)]);
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let (status, json) = get(state_for("default"), "/trajectories?from=2035&to=2025").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn unknown_scenario_is_not_found() {
    let (status, json) = get(state_for("default"), "/trajectories/firm").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|e| e.contains("unoptimized"))
    );
}
