use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, normalize_email};

/// Repository trait for User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user; a taken email yields [`UserError::DuplicateEmail`]
    async fn create(&self, user: User) -> UserResult<User>;

    /// Case-insensitive lookup
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}
