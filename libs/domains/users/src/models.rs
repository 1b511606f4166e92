use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter all fields";

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Trimmed and lowercased
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (password must already be hashed)
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// DTO for user registration
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Please enter all fields"),
        length(min = 1, max = 100, message = "Please enter all fields")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Please enter all fields"),
        email(message = "Please enter a valid email address"),
        length(max = 255, message = "Please enter a valid email address")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Please enter all fields"),
        length(min = 8, max = 128, message = "Password must be between 8 and 128 characters")
    )]
    pub password: Option<String>,
}

/// DTO for user login
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required(message = "Please enter all fields"))]
    pub email: Option<String>,
    #[validate(required(message = "Please enter all fields"))]
    pub password: Option<String>,
}

/// Response after successful registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
}

/// Response after successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}
