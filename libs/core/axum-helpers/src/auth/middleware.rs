use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware.
///
/// Rejects the request with 401 before the handler runs when the bearer token
/// is missing, malformed, expired or badly signed. On success the decoded
/// [`JwtClaims`](super::JwtClaims) are inserted into the request extensions.
///
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/api/events/myevents", get(list_events))
///     .layer(axum::middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_bearer_token(&headers) else {
        tracing::debug!("No bearer token in Authorization header");
        return Err(AppError::Unauthorized("No token provided".to_string()));
    };

    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthUser, JwtConfig};
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("middleware-secret-key-at-least-32-chars"))
    }

    async fn whoami(user: AuthUser) -> String {
        user.email
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware))
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert("authorization", "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(auth())
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let response = app(auth())
            .oneshot(
                Request::get("/me")
                    .header("authorization", "Bearer nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let auth = auth();
        let token = auth
            .issue_token(Uuid::now_v7(), "grace", "grace@example.com")
            .unwrap();

        let response = app(auth)
            .oneshot(
                Request::get("/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
