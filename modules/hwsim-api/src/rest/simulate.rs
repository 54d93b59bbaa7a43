use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::info;

use hwsim_common::{SimulationRequest, SimulationResponse};

use crate::error::ApiResult;
use crate::AppState;

pub async fn api_simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> ApiResult<Json<SimulationResponse>> {
    let Json(request) = payload?;
    info!(
        simulator_type = %request.simulator_type,
        message_len = request.user_message.len(),
        "Simulation requested"
    );

    let response = state.simulator.run(request).await?;
    Ok(Json(response))
}
