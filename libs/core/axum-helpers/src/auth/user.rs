use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// The verified caller, built from the claims that
/// [`jwt_auth_middleware`](super::jwt_auth_middleware) stored on the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl TryFrom<&JwtClaims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: &JwtClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(Self {
            id,
            username: claims.username.clone(),
            email: claims.email.clone(),
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        AuthUser::try_from(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            username: "linus".to_string(),
            email: "linus@example.com".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_auth_user_from_claims() {
        let id = Uuid::now_v7();
        let user = AuthUser::try_from(&claims(&id.to_string())).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "linus@example.com");
    }

    #[test]
    fn test_auth_user_rejects_non_uuid_subject() {
        let err = AuthUser::try_from(&claims("12345")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_missing_claims_is_unauthorized() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
