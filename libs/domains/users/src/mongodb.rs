//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::bson::{self, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, normalize_email};
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: bson::DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: bson::DateTime::from_millis(user.created_at.timestamp_millis()),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = UserError;

    fn try_from(document: UserDocument) -> UserResult<Self> {
        let id = Uuid::parse_str(&document.id)
            .map_err(|e| UserError::Corrupt(format!("invalid _id {:?}: {e}", document.id)))?;
        let created_at =
            chrono::DateTime::from_timestamp_millis(document.created_at.timestamp_millis())
                .ok_or_else(|| UserError::Corrupt(format!("createdAt out of range on user {id}")))?;

        Ok(User {
            id,
            username: document.username,
            email: document.email,
            password_hash: document.password_hash,
            created_at,
        })
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// MongoDB-based user repository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }

    /// Unique email index; registration relies on it for duplicate detection
    pub async fn create_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(UserDocument::from(&user)).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, email))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.collection
            .find_one(doc! { "email": normalize_email(email) })
            .await?
            .map(User::try_from)
            .transpose()
    }
}
