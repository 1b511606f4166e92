use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Corrupt user document: {0}")]
    Corrupt(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            e @ UserError::DuplicateEmail => AppError::Conflict(e.to_string()),
            e @ UserError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            UserError::Validation(message) => AppError::BadRequest(message),
            UserError::PasswordHash(message) | UserError::Token(message) => {
                AppError::InternalServerError(message)
            }
            UserError::Database(e) => AppError::Database(e),
            UserError::Corrupt(message) => AppError::Decode(message),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(UserError::DuplicateEmail.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            UserError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            UserError::PasswordHash("bad salt".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
