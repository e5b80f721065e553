//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, YearRangeQuery};
use crate::config::ProjectionConfig;
use crate::model::summary::SummaryStats;
use crate::model::trajectory::{ChartRow, Scenario};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

/// `GET /config` → 200 + `ProjectionConfig` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ProjectionConfig> {
    Json(state.config.clone())
}

/// `GET /summary` → 200 + `SummaryStats` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryStats> {
    Json(state.summary.clone())
}

/// Returns chart rows, optionally filtered by calendar year.
///
/// `GET /trajectories` → 200 + `Vec<ChartRow>` JSON
/// `GET /trajectories?from=2028&to=2030` → filtered range (inclusive)
/// `GET /trajectories?from=2030&to=2028` → 400 + `ErrorResponse`
pub async fn get_chart_rows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearRangeQuery>,
) -> Result<Json<Vec<ChartRow>>, ApiError> {
    let (from, to) = query.bounds();
    if from > to {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let rows = state
        .trajectories
        .chart_rows()
        .into_iter()
        .filter(|r| (from..=to).contains(&r.year))
        .collect();
    Ok(Json(rows))
}

/// `GET /trajectories/{scenario}` → 200 + `Trajectory` JSON, or 404 for an
/// unknown scenario name.
pub async fn get_trajectory(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match name.parse::<Scenario>() {
        Ok(scenario) => Ok(Json(state.trajectories.get(scenario).clone())),
        Err(e) => Err(error(StatusCode::NOT_FOUND, e.message)),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::model::summary::calculate_summary_stats;

    fn make_test_state(years: u32) -> Arc<AppState> {
        let mut config = ProjectionConfig::default_preset();
        config.projection.years = years;
        let trajectories = config.project().unwrap();
        let summary = calculate_summary_stats(&trajectories, &config.utility);
        Arc::new(AppState {
            config,
            trajectories,
            summary,
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state(10));
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn config_echoes_projection_inputs() {
        let (status, json) = get_json("/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["projection"]["years"], 10);
        assert_eq!(json["utility"]["market_type"], "regulated");
        assert_eq!(json["datacenter"]["capacity_mw"], 1000.0);
        assert_eq!(json["tariff"]["demand_charge_type"], "COINCIDENT_PEAK");
    }

    #[tokio::test]
    async fn summary_returns_200() {
        let (status, json) = get_json("/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_monthly_bill"], 130.0);
        assert!(json["final_year_bills"].get("dispatchable").is_some());
    }

    #[tokio::test]
    async fn chart_rows_cover_horizon() {
        let (status, json) = get_json("/trajectories").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0]["year"], 2025);
        assert_eq!(rows[10]["year"], 2035);
    }

    #[tokio::test]
    async fn chart_rows_range_query() {
        let (status, json) = get_json("/trajectories?from=2028&to=2030").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["year"], 2028);
    }

    #[tokio::test]
    async fn inverted_range_returns_400() {
        let (status, json) = get_json("/trajectories?from=2030&to=2028").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap_or("").contains("2030"));
    }

    #[tokio::test]
    async fn single_trajectory_by_name() {
        let (status, json) = get_json("/trajectories/flexible").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["scenario"], "flexible");
        assert_eq!(json["points"].as_array().map(Vec::len), Some(11));
    }

    #[tokio::test]
    async fn unknown_scenario_returns_404() {
        let (status, json) = get_json("/trajectories/nuclear").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json.get("error").is_some());
    }
}
