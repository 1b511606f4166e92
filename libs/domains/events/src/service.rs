//! Event service layer

use crate::authz::{self, Access};
use crate::error::{EventError, Result};
use crate::models::{Caller, CreateEvent, Event, MutationOutcome, UpdateEvent};
use crate::repository::EventRepository;
use crate::scope::{self, Mutation, MutationScope};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Event service: validation, series keys, authorization and scoped mutations
pub struct EventService<R: EventRepository> {
    repository: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Create one event owned by the caller
    #[instrument(skip(self, caller, create), fields(caller_id = %caller.id))]
    pub async fn create(&self, caller: &Caller, create: CreateEvent) -> Result<Event> {
        let new_event = create.into_new_event().map_err(EventError::Validation)?;

        if new_event.end_time.is_some_and(|end| end < new_event.start_time) {
            warn!(start_time = %new_event.start_time, "Event ends before it starts");
        }

        let event = self
            .repository
            .create(new_event.into_event(caller.id))
            .await?;
        info!(event_id = %event.id, series_id = %event.series_id, "Event created");

        Ok(event)
    }

    /// Get one event the caller created or participates in
    #[instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn get_visible(&self, caller: &Caller, id: Uuid) -> Result<Event> {
        let event = self.load(id).await?;

        if !authz::can_view(&event, caller) {
            return Err(EventError::Forbidden { action: "view" });
        }
        Ok(event)
    }

    /// Events the caller created or participates in, earliest first
    #[instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<Event>> {
        self.repository
            .find_visible(caller.id, &caller.email)
            .await
    }

    /// Apply an update to the target event and, depending on scope, its series
    #[instrument(skip(self, caller, update), fields(caller_id = %caller.id))]
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        update: UpdateEvent,
    ) -> Result<MutationOutcome> {
        let target = self.load(id).await?;
        if authz::authorize(&target, caller.id) == Access::Denied {
            return Err(EventError::Forbidden { action: "update" });
        }

        let scope = update.scope();
        let patch = update.into_patch().map_err(EventError::Validation)?;
        let resolution = scope::resolve(&target, scope, Mutation::Update);

        let affected = if patch.is_empty() {
            0
        } else {
            self.repository
                .update_many(&resolution.selection, &patch)
                .await?
        };
        info!(%scope, affected, series_id = %target.series_id, "Events updated");

        Ok(MutationOutcome {
            message: resolution.message.to_string(),
            scope,
            affected,
        })
    }

    /// Delete the target event and, depending on scope, its series
    #[instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn delete(
        &self,
        caller: &Caller,
        id: Uuid,
        scope: MutationScope,
    ) -> Result<MutationOutcome> {
        let target = self.load(id).await?;
        if authz::authorize(&target, caller.id) == Access::Denied {
            return Err(EventError::Forbidden { action: "delete" });
        }

        let resolution = scope::resolve(&target, scope, Mutation::Delete);
        let affected = self.repository.delete_many(&resolution.selection).await?;
        info!(%scope, affected, series_id = %target.series_id, "Events deleted");

        Ok(MutationOutcome {
            message: resolution.message.to_string(),
            scope,
            affected,
        })
    }

    async fn load(&self, id: Uuid) -> Result<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEvent, Recurrence, RecurrenceType};
    use crate::repository::mock::MockEventRepository;
    use crate::scope::Selection;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use serde_json::json;

    fn caller() -> Caller {
        Caller::new(Uuid::now_v7(), "ada@example.com")
    }

    fn daily_event(creator: Uuid) -> Event {
        NewEvent {
            title: "Standup".into(),
            description: None,
            start_time: Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap(),
            end_time: None,
            participants: vec!["bob@example.com".into()],
            recurrence: Recurrence {
                kind: RecurrenceType::Daily,
                interval: Some(1),
                until: None,
            },
        }
        .into_event(creator)
    }

    fn update(body: serde_json::Value) -> UpdateEvent {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_creator_and_series_key() {
        let caller = caller();
        let mut mock_repo = MockEventRepository::new();
        mock_repo.expect_create().times(1).returning(|event| Ok(event));

        let service = EventService::new(mock_repo);
        let create = serde_json::from_value(json!({
            "title": "Weekly 1:1",
            "startTime": "2025-03-03T10:00:00Z",
            "recurrence": { "type": "weekly", "interval": 1 }
        }))
        .unwrap();

        let event = service.create(&caller, create).await.unwrap();
        assert_eq!(event.creator_id, caller.id);
        assert!(event.series_id.is_series_key());
        assert_ne!(event.series_id.as_str(), event.id.to_string());
    }

    #[tokio::test]
    async fn test_create_validation_error_skips_store() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo.expect_create().never();

        let service = EventService::new(mock_repo);
        let create = serde_json::from_value(json!({ "title": "No start" })).unwrap();

        let err = service.create(&caller(), create).await.unwrap_err();
        assert!(matches!(err, EventError::Validation(m) if m == "Title and startTime are required fields."));
    }

    #[tokio::test]
    async fn test_create_allows_end_before_start() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo.expect_create().times(1).returning(|event| Ok(event));

        let service = EventService::new(mock_repo);
        let create = serde_json::from_value(json!({
            "title": "Backwards",
            "startTime": "2025-03-03T10:00:00Z",
            "endTime": "2025-03-03T09:00:00Z"
        }))
        .unwrap();

        assert!(service.create(&caller(), create).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_without_scope_targets_record() {
        let caller = caller();
        let target = daily_event(caller.id);
        let target_id = target.id;

        let mut mock_repo = MockEventRepository::new();
        let stored = target.clone();
        mock_repo
            .expect_get_by_id()
            .with(eq(target_id))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        mock_repo
            .expect_update_many()
            .withf(move |selection, patch| {
                *selection == Selection::Record { id: target_id }
                    && patch.title.as_deref() == Some("Sync")
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let service = EventService::new(mock_repo);
        let outcome = service
            .update(&caller, target_id, update(json!({ "title": "Sync" })))
            .await
            .unwrap();

        assert_eq!(outcome.scope, MutationScope::ThisEvent);
        assert_eq!(outcome.affected, 1);
        assert_eq!(outcome.message, "Event updated successfully.");
    }

    #[tokio::test]
    async fn test_update_this_and_following_selects_from_target_start() {
        let caller = caller();
        let target = daily_event(caller.id);
        let expected = Selection::SeriesFrom {
            series_id: target.series_id.clone(),
            start_time: target.start_time,
        };

        let mut mock_repo = MockEventRepository::new();
        let stored = target.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock_repo
            .expect_update_many()
            .withf(move |selection, _| *selection == expected)
            .times(1)
            .returning(|_, _| Ok(3));

        let service = EventService::new(mock_repo);
        let outcome = service
            .update(
                &caller,
                target.id,
                update(json!({ "location": "ignored", "title": "Moved", "updateScope": "thisAndFollowing" })),
            )
            .await
            .unwrap();

        assert_eq!(outcome.affected, 3);
        assert_eq!(outcome.message, "This event and all following events updated successfully.");
    }

    #[tokio::test]
    async fn test_non_creator_is_forbidden_for_every_scope() {
        let owner = Uuid::now_v7();
        let target = daily_event(owner);

        for scope in ["thisEvent", "thisAndFollowing", "allEvents"] {
            let mut mock_repo = MockEventRepository::new();
            let stored = target.clone();
            mock_repo
                .expect_get_by_id()
                .returning(move |_| Ok(Some(stored.clone())));
            mock_repo.expect_update_many().never();
            mock_repo.expect_delete_many().never();

            let service = EventService::new(mock_repo);
            let bob = Caller::new(Uuid::now_v7(), "bob@example.com");

            let err = service
                .update(&bob, target.id, update(json!({ "title": "x", "updateScope": scope })))
                .await
                .unwrap_err();
            assert!(matches!(err, EventError::Forbidden { action: "update" }));

            let err = service
                .delete(&bob, target.id, MutationScope::from_selector(Some(&json!(scope))))
                .await
                .unwrap_err();
            assert!(matches!(err, EventError::Forbidden { action: "delete" }));
        }
    }

    #[tokio::test]
    async fn test_update_missing_event_is_not_found() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = EventService::new(mock_repo);
        let err = service
            .update(&caller(), Uuid::now_v7(), update(json!({ "title": "x" })))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::NotFound));
    }

    #[tokio::test]
    async fn test_failed_load_stops_before_any_batch() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo
            .expect_get_by_id()
            .times(2)
            .returning(|_| Err(EventError::Corrupt("bad seriesId".into())));
        mock_repo.expect_update_many().never();
        mock_repo.expect_delete_many().never();

        let service = EventService::new(mock_repo);
        let caller = caller();

        let err = service
            .update(&caller, Uuid::now_v7(), update(json!({ "title": "x" })))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Corrupt(_)));

        let err = service
            .delete(&caller, Uuid::now_v7(), MutationScope::AllEvents)
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_empty_update_skips_batch() {
        let caller = caller();
        let target = daily_event(caller.id);

        let mut mock_repo = MockEventRepository::new();
        let stored = target.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock_repo.expect_update_many().never();

        let service = EventService::new(mock_repo);
        let outcome = service
            .update(&caller, target.id, update(json!({ "updateScope": "allEvents" })))
            .await
            .unwrap();
        assert_eq!(outcome.affected, 0);
        assert_eq!(outcome.scope, MutationScope::AllEvents);
    }

    #[tokio::test]
    async fn test_delete_all_events_selects_series() {
        let caller = caller();
        let target = daily_event(caller.id);
        let expected = Selection::Series {
            series_id: target.series_id.clone(),
        };

        let mut mock_repo = MockEventRepository::new();
        let stored = target.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock_repo
            .expect_delete_many()
            .withf(move |selection| *selection == expected)
            .times(1)
            .returning(|_| Ok(5));

        let service = EventService::new(mock_repo);
        let outcome = service
            .delete(&caller, target.id, MutationScope::AllEvents)
            .await
            .unwrap();
        assert_eq!(outcome.affected, 5);
        assert_eq!(outcome.message, "All events in the series deleted successfully.");
    }

    #[tokio::test]
    async fn test_participant_can_view_but_stranger_cannot() {
        let target = daily_event(Uuid::now_v7());

        let mut mock_repo = MockEventRepository::new();
        let stored = target.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = EventService::new(mock_repo);
        let bob = Caller::new(Uuid::now_v7(), "BOB@example.com");
        assert_eq!(service.get_visible(&bob, target.id).await.unwrap().id, target.id);

        let eve = Caller::new(Uuid::now_v7(), "eve@example.com");
        let err = service.get_visible(&eve, target.id).await.unwrap_err();
        assert!(matches!(err, EventError::Forbidden { action: "view" }));
    }

    #[tokio::test]
    async fn test_list_visible_passes_lowercased_email() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo
            .expect_find_visible()
            .withf(|_, email| email == "ada@example.com")
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = EventService::new(mock_repo);
        let caller = Caller::new(Uuid::now_v7(), "Ada@Example.com");
        assert!(service.list_visible(&caller).await.unwrap().is_empty());
    }
}
