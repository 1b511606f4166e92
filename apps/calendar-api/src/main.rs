use axum_helpers::{JwtAuth, server::{create_production_app, health_router}};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = config.mongodb.database(), "Connecting to MongoDB");
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    api::events::init_indexes(&db).await?;
    api::auth::init_indexes(&db).await?;

    let jwt = JwtAuth::new(&config.jwt);
    let state = AppState {
        config,
        mongo_client,
        db,
        jwt,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router.merge(health_router(state.config.app.clone()));

    info!(address = %state.config.server.address(), "Starting calendar API (30s shutdown timeout)");

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Calendar API shutdown complete");
    Ok(())
}
