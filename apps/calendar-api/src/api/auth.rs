//! Registration and login routes.

use axum::Router;
use domain_users::{MongoUserRepository, UserService};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = UserService::new(MongoUserRepository::new(&state.db));
    domain_users::router(service, state.jwt.clone())
}

/// Create the unique email index
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");
    Ok(())
}
