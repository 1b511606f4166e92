//! Events API routes, all behind bearer authentication.

use axum::{Router, middleware};
use axum_helpers::jwt_auth_middleware;
use domain_events::{EventService, MongoEventRepository};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = EventService::new(MongoEventRepository::new(&state.db));

    domain_events::router(service).layer(middleware::from_fn_with_state(
        state.jwt.clone(),
        jwt_auth_middleware,
    ))
}

/// Create the event collection indexes
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoEventRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes created");
    Ok(())
}
