//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`auth`]**: stateless JWT issuance/verification, bearer middleware and
//!   the [`AuthUser`] extractor
//! - **[`server`]**: documented router, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: [`AppError`] and the structured [`ErrorResponse`] body
//! - **[`extractors`]**: [`ValidatedJson`] and [`UuidPath`]
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &server_config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AuthUser, JwtAuth, JwtClaims, JwtConfig, jwt_auth_middleware};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    create_router_with_cors, health_router, run_health_checks,
};

pub use http::{cors_layer_from_env, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
