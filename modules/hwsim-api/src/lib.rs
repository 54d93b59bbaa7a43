//! HTTP surface for the simulation pipeline.

pub mod error;
pub mod rest;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use hwsim_common::Config;
use hwsim_engine::Simulator;

pub use error::{ApiError, ApiResult};

pub struct AppState {
    pub config: Arc<Config>,
    pub simulator: Simulator,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let simulator = Simulator::from_config(&config);
        Self { config, simulator }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Service metadata
        .route("/", get(rest::api_root))
        .route("/health", get(rest::api_health))
        // Simulation API
        .route("/api/v1/simulate", post(rest::simulate::api_simulate))
        .route("/api/v1/simulate/", post(rest::simulate::api_simulate))
        .route("/api/v1/simulate/types", get(rest::api_simulator_types))
        .route("/api/v1/simulate/types/{kind}", get(rest::api_simulator_type))
        .route("/api/v1/simulate/schema/{kind}", get(rest::api_input_schema))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Results are computed per request; never cache them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only (no bodies)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
        )
}
