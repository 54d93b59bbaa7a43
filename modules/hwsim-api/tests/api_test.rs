//! HTTP tests driving the router in-process.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use hwsim_api::{build_router, AppState};
use hwsim_common::{Config, SimulationDefaults};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app() -> Router {
    build_router(Arc::new(AppState::new(Arc::new(Config::default()))))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_raw(uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

async fn simulate(body: Value) -> (StatusCode, Value) {
    post_raw("/api/v1/simulate", body.to_string()).await
}

// ---------------------------------------------------------------------------
// Metadata endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn root_returns_service_metadata() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Simulation Chatbot API");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["docs"], "/api/v1/simulate/schema/{kind}");
}

#[tokio::test]
async fn types_lists_both_simulators() {
    let (status, body) = get("/api/v1/simulate/types").await;
    assert_eq!(status, StatusCode::OK);

    let types = body["simulator_types"].as_array().unwrap();
    let kinds: Vec<&str> = types.iter().map(|t| t["type"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["cpu_architecture", "semiconductor_fab"]);
    assert!(types.iter().all(|t| t["name"].is_string() && t["description"].is_string()));
}

#[tokio::test]
async fn single_type_lookup() {
    let (status, body) = get("/api/v1/simulate/types/cpu_architecture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "cpu_architecture");

    let (status, body) = get("/api/v1/simulate/types/quantum").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("quantum"));
}

#[tokio::test]
async fn input_schema_describes_the_record() {
    let (status, body) = get("/api/v1/simulate/schema/semiconductor_fab").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["properties"]["technology_node"].is_object());
    assert!(body["properties"]["killer_defect_ratio"].is_object());

    let (status, _) = get("/api/v1/simulate/schema/quantum").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Simulation endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cpu_simulation_from_text() {
    let (status, body) = simulate(json!({
        "simulator_type": "cpu_architecture",
        "user_message": "4코어 CPU, 3.2GHz 클럭 주파수, L1 캐시 32KB, L2 캐시 256KB로 시뮬레이션 해줘"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["simulator_type"], "cpu_architecture");
    assert!((body["cpu_output"]["ipc"].as_f64().unwrap() - 3.136).abs() < 1e-9);
    assert!(body["fab_output"].is_null());
    assert_eq!(body["extracted_params"]["number_of_cores"], 4);
    assert!(body["message"].as_str().unwrap().contains("CPU Architecture Simulation Results"));
}

#[tokio::test]
async fn fab_simulation_with_explicit_input() {
    let mut fab_input = serde_json::to_value(SimulationDefaults::default().fab).unwrap();
    fab_input["lithography_source"] = json!("euv");

    let (status, body) = simulate(json!({
        "simulator_type": "semiconductor_fab",
        "user_message": "ignored 3nm",
        "fab_input": fab_input
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extracted_params"], json!({}));
    assert_eq!(body["fab_output"]["bottleneck_station_id"], "Lithography_Scanner_02");
    assert!(body["cpu_output"].is_null());
}

#[tokio::test]
async fn trailing_slash_is_accepted() {
    let (status, body) = post_raw(
        "/api/v1/simulate/",
        json!({ "simulator_type": "semiconductor_fab", "user_message": "" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["fab_output"].is_object());
}

#[tokio::test]
async fn out_of_range_value_is_a_client_error() {
    let (status, body) = simulate(json!({
        "simulator_type": "cpu_architecture",
        "user_message": "run it at 15 GHz"
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("clock_frequency"));
}

#[tokio::test]
async fn unknown_simulator_is_a_client_error() {
    let (status, body) = simulate(json!({
        "simulator_type": "quantum_annealer",
        "user_message": "hi"
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("quantum_annealer"));
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let (status, body) = post_raw("/api/v1/simulate", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = simulate(json!({ "user_message": "missing kind" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn computation_failure_does_not_leak_details() {
    let mut cpu_input = serde_json::to_value(SimulationDefaults::default().cpu).unwrap();
    cpu_input["l1_cache_config"]["latency"] = json!(90);
    cpu_input["main_memory_latency"] = json!(50);

    let (status, body) = simulate(json!({
        "simulator_type": "cpu_architecture",
        "cpu_input": cpu_input
    }))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}
