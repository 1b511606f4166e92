use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, MISSING_FIELDS_MESSAGE, RegisterRequest, User};
use crate::repository::UserRepository;

/// Service layer for registration and credential checks
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an account; expects a validated request
    #[instrument(skip_all)]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<User> {
        let (Some(username), Some(email), Some(password)) =
            (input.username, input.email, input.password)
        else {
            return Err(UserError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail);
        }

        let user = User::new(&username, &email, hash_password(&password)?);
        let user = self.repository.create(user).await?;
        info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Check an email and password pair
    #[instrument(skip_all)]
    pub async fn verify_credentials(&self, input: LoginRequest) -> UserResult<User> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(UserError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }
}

// Password helpers

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
