#![allow(dead_code)]

use async_trait::async_trait;
use domain_events::{Event, EventPatch, EventRepository, Result, Selection};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Event store kept in a Vec, applying selections the same way MongoDB filters do.
#[derive(Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }

    pub async fn insert(&self, event: Event) {
        self.events.write().await.push(event);
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> Result<Event> {
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn find_visible(&self, user_id: Uuid, email: &str) -> Result<Vec<Event>> {
        let mut visible: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.is_creator(user_id) || e.has_participant(email))
            .cloned()
            .collect();
        visible.sort_by_key(|e| e.start_time);
        Ok(visible)
    }

    async fn update_many(&self, selection: &Selection, patch: &EventPatch) -> Result<u64> {
        let mut events = self.events.write().await;
        let mut matched = 0;
        for event in events.iter_mut().filter(|e| selection.matches(e)) {
            patch.apply_to(event);
            matched += 1;
        }
        Ok(matched)
    }

    async fn delete_many(&self, selection: &Selection) -> Result<u64> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| !selection.matches(e));
        Ok((before - events.len()) as u64)
    }
}
