//! UUID path parameter extractor with automatic validation.

use crate::errors::{AppError, ErrorCode};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extractor for a single UUID path parameter.
///
/// A malformed id is rejected with `400 INVALID_UUID` before the handler runs.
///
/// ```ignore
/// async fn get_event(UuidPath(id): UuidPath) -> String {
///     id.to_string()
/// }
///
/// let app = Router::new().route("/events/{id}", get(get_event));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&id).map(UuidPath).map_err(|e| {
            tracing::debug!(error_code = ErrorCode::InvalidUuid.code(), %id, "rejecting path id");
            AppError::UuidError(e).into_response()
        })
    }
}
