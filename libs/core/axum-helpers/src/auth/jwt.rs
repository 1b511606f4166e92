use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,      // Subject (user ID)
    pub username: String, // Display name
    pub email: String,    // User email, lowercased
    pub exp: i64,         // Expiration time
    pub iat: i64,         // Issued at
    pub jti: String,      // Token ID
}

/// Stateless HS256 token issuer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Lifetime of issued tokens in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a signed token for a user.
    pub fn issue_token(&self, user_id: Uuid, username: &str, email: &str) -> eyre::Result<String> {
        let now = Utc::now();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify the signature and expiry, then decode the claims.
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-key-that-is-at-least-32-chars"))
    }

    #[test]
    fn test_issue_and_verify_token() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth.issue_token(user_id, "ada", "ada@example.com").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let a = auth.verify_token(&auth.issue_token(user_id, "a", "a@x.io").unwrap()).unwrap();
        let b = auth.verify_token(&auth.issue_token(user_id, "a", "a@x.io").unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-key-that-is-32-chars-long"));
        let token = other.issue_token(Uuid::now_v7(), "a", "a@x.io").unwrap();

        assert!(auth().verify_token(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let config = JwtConfig::new("test-secret-key-that-is-at-least-32-chars").with_ttl_secs(-600);
        let auth = JwtAuth::new(&config);
        let token = auth.issue_token(Uuid::now_v7(), "a", "a@x.io").unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(auth().verify_token("not.a.token").is_err());
    }
}
