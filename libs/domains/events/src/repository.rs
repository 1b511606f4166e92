//! Event repository trait

use crate::error::Result;
use crate::models::{Event, EventPatch};
use crate::scope::Selection;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage operations the event service relies on
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event
    async fn create(&self, event: Event) -> Result<Event>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    /// Events created by `user_id` or listing `email` as a participant,
    /// sorted by start time ascending
    async fn find_visible(&self, user_id: Uuid, email: &str) -> Result<Vec<Event>>;

    /// Merge `patch` into every selected event; returns the match count
    async fn update_many(&self, selection: &Selection, patch: &EventPatch) -> Result<u64>;

    /// Remove every selected event; returns the deleted count
    async fn delete_many(&self, selection: &Selection) -> Result<u64>;
}
