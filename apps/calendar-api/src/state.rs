//! Shared application state.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Cloned into each router builder; clones share the connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
    /// Token issuer for `/api/auth`, verifier for `/api/events`
    pub jwt: JwtAuth,
}
