use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use hwsim_api::telemetry::{init_tracing, LogFormat};
use hwsim_api::{build_router, AppState};
use hwsim_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LogFormat::from_env())?;

    let config = Arc::new(Config::from_env()?);
    let state = Arc::new(AppState::new(config.clone()));
    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("{} v{} starting on {addr}", config.api_title, config.api_version);
    info!("Input schemas available at http://{addr}/api/v1/simulate/schema/{{kind}}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
