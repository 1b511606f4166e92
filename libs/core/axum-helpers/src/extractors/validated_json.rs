//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Body parse failures and validation failures both surface as
/// `400 Bad Request` in the standard [`ErrorResponse`](crate::ErrorResponse)
/// shape. When a field declares a custom validation message, that message
/// becomes the response `message`.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Login {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<Login>) -> String {
///     payload.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::JsonExtractorRejection(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::ValidationError(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
