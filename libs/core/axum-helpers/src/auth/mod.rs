//! Stateless bearer-token authentication.
//!
//! - [`JwtAuth`] issues and verifies HS256 tokens
//! - [`jwt_auth_middleware`] guards a router and stores [`JwtClaims`] in the
//!   request extensions
//! - [`AuthUser`] extracts the verified caller in handlers
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/api/events/myevents", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod user;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::jwt_auth_middleware;
pub use user::AuthUser;
