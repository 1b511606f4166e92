//! Event domain error types

use axum_helpers::AppError;
use thiserror::Error;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

pub const EVENT_NOT_FOUND_MESSAGE: &str = "Event not found.";

/// Event domain errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found.")]
    NotFound,

    /// `action` is `update`, `delete` or `view`
    #[error("You are not authorized to {action} this event.")]
    Forbidden { action: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A stored document that no longer maps onto [`crate::Event`]
    #[error("Corrupt event document: {0}")]
    Corrupt(String),
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound => AppError::NotFound(EVENT_NOT_FOUND_MESSAGE.to_string()),
            e @ EventError::Forbidden { .. } => AppError::Forbidden(e.to_string()),
            EventError::Validation(message) => AppError::BadRequest(message),
            EventError::Database(e) => AppError::Database(e),
            EventError::Corrupt(message) => AppError::Decode(message),
        }
    }
}

impl axum::response::IntoResponse for EventError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
