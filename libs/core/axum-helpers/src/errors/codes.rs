//! Type-safe error codes for API responses.
//!
//! Each code carries a string identifier for clients, an integer for logs and
//! monitoring, and a default human-readable message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Forbidden;
//! assert_eq!(code.as_str(), "FORBIDDEN");
//! assert_eq!(code.code(), 1007);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path or query parameter
    InvalidUuid,

    /// Request body could not be parsed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// Authenticated user lacks sufficient permissions
    Forbidden,

    /// Request conflicts with current resource state (e.g., duplicate email)
    Conflict,

    /// Generic malformed request
    BadRequest,

    // Server errors
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// MongoDB command or query failed
    DatabaseError,

    /// Stored document could not be decoded into the domain type
    DatabaseDecode,

    /// MongoDB server selection or connection failed
    DatabaseUnavailable,

    // Serialization errors (5000s)
    /// JSON serialization/deserialization error
    SerdeJsonError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseDecode => "DATABASE_DECODE",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: database errors
    /// - 5000-5999: serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::BadRequest => 1009,
            Self::ServiceUnavailable => 1011,

            Self::DatabaseError => 2001,
            Self::DatabaseDecode => 2002,
            Self::DatabaseUnavailable => 2003,

            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::BadRequest => "Bad request",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseDecode => "Failed to decode stored document",
            Self::DatabaseUnavailable => "Database is unavailable",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
