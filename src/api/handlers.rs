//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, HourlyQuery};
use crate::sim::engine::run_simulation;
use crate::sim::types::{HourlyRecord, SimulationParameters, SimulationResult};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// `GET /result` → 200 + `SimulationResult` JSON
pub async fn get_result(State(state): State<Arc<AppState>>) -> Json<SimulationResult> {
    Json(state.result.clone())
}

/// Returns hourly records, optionally filtered by hour range.
///
/// `GET /hourly` → 200 + `Vec<HourlyRecord>` JSON
/// `GET /hourly?from=N&to=M` → filtered range (inclusive)
/// `GET /hourly?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HourlyQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(bad_request(format!("`from` ({from}) must be <= `to` ({to})")));
    }

    let records: Vec<HourlyRecord> = state
        .result
        .hourly_data
        .iter()
        .filter(|r| r.hour >= from && r.hour <= to)
        .cloned()
        .collect();

    Ok(Json(records))
}

/// `GET /recommendations` → 200 + `Vec<String>` JSON
pub async fn get_recommendations(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.result.recommendations.clone())
}

/// Runs a new simulation for the posted parameters.
///
/// `POST /simulate` → 200 + `SimulationResult` JSON, or 400 + `ErrorResponse`
/// when a parameter is out of range.
pub async fn post_simulate(
    Json(params): Json<SimulationParameters>,
) -> Result<Json<SimulationResult>, ApiError> {
    run_simulation(&params).map(Json).map_err(|e| {
        warn!(error = %e, "rejected simulation request");
        bad_request(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;

    fn make_test_state() -> Arc<AppState> {
        let params = SimulationParameters {
            ml_optimization: false,
            ..SimulationParameters::default()
        };
        let result = run_simulation(&params).unwrap();
        Arc::new(AppState { result })
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn result_returns_200() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/result")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["duration"], 24);
        assert_eq!(json["hourlyData"].as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn hourly_range_query() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/hourly?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6); // hours 5,6,7,8,9,10
        assert_eq!(rows[0]["hour"], 5);
        assert_eq!(rows[5]["hour"], 10);
    }

    #[tokio::test]
    async fn hourly_invalid_range_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/hourly?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn recommendations_end_with_standing_advice() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/recommendations")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let recs = json.as_array().unwrap();
        assert!(recs.len() >= 2);
        assert!(recs[recs.len() - 1].as_str().unwrap().contains("predictive maintenance"));
    }

    #[tokio::test]
    async fn simulate_runs_posted_parameters() {
        let app = router(make_test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/simulate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"duration_hours": 1, "ml_optimization": false}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["duration"], 1);
        assert_eq!(json["finalBatterySOC"], 60.0);
    }

    #[tokio::test]
    async fn simulate_invalid_parameters_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/simulate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"battery_capacity_kwh": 0}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("battery_capacity_kwh"));
    }

    #[tokio::test]
    async fn simulate_oversized_duration_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/simulate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"duration_hours": 1000000000000}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("duration_hours"));
    }
}
