pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 1007)
/// - `error`: machine-readable identifier (e.g., "FORBIDDEN")
/// - `message`: human-readable message
/// - `details`: optional structured details (e.g., validation errors)
///
/// ```json
/// {
///   "code": 1007,
///   "error": "FORBIDDEN",
///   "message": "You are not authorized to delete this event."
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Document decode error: {0}")]
    Decode(String),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status and error code this error renders with.
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::SerdeJson(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::SerdeJsonError),
            AppError::Database(e) => map_mongo_error(e),
            AppError::Decode(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseDecode),
            AppError::JsonExtractorRejection(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::JsonExtraction)
            }
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            AppError::UuidError(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidUuid),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, details) = match self {
            // Server-side failures: log the detail, return the generic message.
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = code.code(), "JSON parsing error: {:?}", e);
                (code.default_message().to_string(), None)
            }
            AppError::Database(e) => {
                tracing::error!(error_code = code.code(), "Database error: {:?}", e);
                (code.default_message().to_string(), None)
            }
            AppError::Decode(e) => {
                tracing::error!(error_code = code.code(), "Document decode error: {}", e);
                (code.default_message().to_string(), None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (code.default_message().to_string(), None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (msg, None)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {:?}", e);
                let message = first_validation_message(&e)
                    .unwrap_or_else(|| code.default_message().to_string());
                (message, Some(validation_details(&e)))
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = code.code(), "UUID error: {:?}", e);
                (code.default_message().to_string(), None)
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                tracing::info!(error_code = code.code(), status = %status, "{}", msg);
                (msg, None)
            }
        };

        let mut body = ErrorResponse::new(code, message);
        body.details = details;

        (status, Json(body)).into_response()
    }
}

fn map_mongo_error(error: &mongodb::error::Error) -> (StatusCode, ErrorCode) {
    use mongodb::error::ErrorKind;

    match *error.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::ConnectionPoolCleared { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DatabaseUnavailable)
        }
        ErrorKind::BsonDeserialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseDecode)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    }
}

/// Field-keyed validation details: `{field: [{code, message, params}]}`.
///
/// Nested structs are flattened with dotted paths (`recurrence.interval`).
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    collect_field_errors(errors, "", &mut map);
    serde_json::Value::Object(map)
}

fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: &str,
    out: &mut serde_json::Map<String, serde_json::Value>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let entries = errs
                    .iter()
                    .map(|err| {
                        serde_json::json!({
                            "code": err.code,
                            "message": err.message,
                            "params": err.params,
                        })
                    })
                    .collect::<Vec<_>>();
                out.insert(path, serde_json::Value::Array(entries));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// First custom validation message, if any field declared one.
///
/// Field names are visited in sorted order so the result is stable.
pub fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    use validator::ValidationErrorsKind;

    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields.into_iter().find_map(|(_, kind)| match kind {
        ValidationErrorsKind::Field(errs) => errs
            .iter()
            .find_map(|err| err.message.as_ref().map(|m| m.to_string())),
        ValidationErrorsKind::Struct(inner) => first_validation_message(inner),
        ValidationErrorsKind::List(items) => {
            items.values().find_map(|inner| first_validation_message(inner))
        }
    })
}

/// Helper to build a bare error response.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}
