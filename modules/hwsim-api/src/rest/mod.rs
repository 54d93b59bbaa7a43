pub mod simulate;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use schemars::{schema::RootSchema, schema_for};
use serde::Serialize;
use serde_json::json;

use hwsim_common::{
    CpuArchitectureInput, SemiconductorFabInput, SimulatorDescriptor, SimulatorKind,
};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Serialize)]
pub struct SimulatorTypes {
    simulator_types: Vec<SimulatorDescriptor>,
}

pub async fn api_root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = &state.config;
    Json(json!({
        "message": config.api_title,
        "version": config.api_version,
        "description": config.api_description,
        "docs": "/api/v1/simulate/schema/{kind}",
    }))
}

pub async fn api_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn api_simulator_types() -> Json<SimulatorTypes> {
    Json(SimulatorTypes {
        simulator_types: SimulatorKind::ALL.iter().map(|k| k.descriptor()).collect(),
    })
}

pub async fn api_simulator_type(Path(kind): Path<String>) -> ApiResult<Json<SimulatorDescriptor>> {
    let kind: SimulatorKind = kind.parse()?;
    Ok(Json(kind.descriptor()))
}

/// JSON Schema of the explicit input record accepted for `kind`.
pub async fn api_input_schema(Path(kind): Path<String>) -> ApiResult<Json<RootSchema>> {
    let schema = match kind.parse::<SimulatorKind>()? {
        SimulatorKind::CpuArchitecture => schema_for!(CpuArchitectureInput),
        SimulatorKind::SemiconductorFab => schema_for!(SemiconductorFabInput),
    };
    Ok(Json(schema))
}
