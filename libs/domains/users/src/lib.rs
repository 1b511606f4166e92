//! Users Domain
//!
//! Registration and password login. Successful calls return a signed
//! bearer token that the events API accepts.
//!
//! ```text
//! Handlers   → issue tokens via axum_helpers::JwtAuth
//! Service    → argon2 hashing, credential checks
//! Repository → MongoDB (unique email index) or in-memory
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, AuthState, router};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
pub use self::mongodb::{MongoUserRepository, USERS_COLLECTION};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
