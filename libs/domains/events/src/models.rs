//! Event domain models

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::scope::MutationScope;
use crate::series::SeriesId;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and startTime are required fields.";
pub const INVALID_RECURRENCE_TYPE_MESSAGE: &str =
    "Invalid recurrence type. Must be one of: none, daily, weekly, monthly.";
pub const INVALID_INTERVAL_MESSAGE: &str = "Recurrence interval must be a positive integer.";
pub const BLANK_TITLE_MESSAGE: &str = "Title cannot be empty.";

/// How an event repeats
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    pub fn is_recurring(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Recurrence rule embedded in every event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,

    /// Repeat every `interval` units of `type`; at least 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,

    /// Last instant the series may occur
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

/// A stored calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub creator_id: Uuid,
    /// Lowercased participant emails
    pub participants: Vec<String>,
    pub recurrence: Recurrence,
    pub series_id: SeriesId,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_creator(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }

    /// `email` must already be lowercased.
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// The authenticated user acting on events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    /// Lowercased
    pub email: String,
}

impl Caller {
    pub fn new(id: Uuid, email: &str) -> Self {
        Self {
            id,
            email: email.trim().to_lowercase(),
        }
    }
}

impl From<axum_helpers::AuthUser> for Caller {
    fn from(user: axum_helpers::AuthUser) -> Self {
        Self::new(user.id, &user.email)
    }
}

/// Recurrence as sent by clients; the type stays a string until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecurrenceInput {
    /// One of `none`, `daily`, `weekly`, `monthly`; defaults to `none`
    #[serde(rename = "type", default)]
    #[validate(custom(function = "known_recurrence_type"))]
    pub kind: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "positive_interval"))]
    pub interval: Option<i64>,

    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

impl RecurrenceInput {
    /// Only call after validation succeeded.
    fn into_recurrence(self) -> Recurrence {
        let kind = self
            .kind
            .as_deref()
            .and_then(|k| RecurrenceType::from_str(k).ok())
            .unwrap_or_default();

        Recurrence {
            kind,
            interval: self.interval.and_then(|i| u32::try_from(i).ok()),
            until: self.until.map(|u| u.trunc_subsecs(3)),
        }
    }
}

fn known_recurrence_type(kind: &str) -> Result<(), ValidationError> {
    RecurrenceType::from_str(kind).map(|_| ()).map_err(|_| {
        ValidationError::new("recurrence_type")
            .with_message(Cow::Borrowed(INVALID_RECURRENCE_TYPE_MESSAGE))
    })
}

/// Any interval from 1 up to what the stored `u32` holds.
fn positive_interval(interval: i64) -> Result<(), ValidationError> {
    match u32::try_from(interval) {
        Ok(n) if n >= 1 => Ok(()),
        _ => Err(ValidationError::new("interval")
            .with_message(Cow::Borrowed(INVALID_INTERVAL_MESSAGE))),
    }
}

fn title_present(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed(REQUIRED_FIELDS_MESSAGE)));
    }
    Ok(())
}

fn title_not_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed(BLANK_TITLE_MESSAGE)));
    }
    Ok(())
}

/// Request body for `POST /api/events`.
///
/// `seriesId`, `creatorId` and `id` are never read from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(required, custom(function = "title_present"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(required)]
    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub participants: Option<Vec<String>>,

    #[validate(nested)]
    pub recurrence: Option<RecurrenceInput>,
}

/// Fields for a new event after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub participants: Vec<String>,
    pub recurrence: Recurrence,
}

impl CreateEvent {
    /// Validate and normalize, reporting the first problem as a client message.
    pub fn into_new_event(self) -> Result<NewEvent, String> {
        self.validate().map_err(|e| describe_validation(&e))?;

        let (Some(title), Some(start_time)) = (self.title, self.start_time) else {
            return Err(REQUIRED_FIELDS_MESSAGE.to_string());
        };

        Ok(NewEvent {
            title: title.trim().to_string(),
            description: normalize_description(self.description),
            start_time: start_time.trunc_subsecs(3),
            end_time: self.end_time.map(|t| t.trunc_subsecs(3)),
            participants: normalize_participants(self.participants.unwrap_or_default()),
            recurrence: self
                .recurrence
                .map(RecurrenceInput::into_recurrence)
                .unwrap_or_default(),
        })
    }
}

impl NewEvent {
    /// Materialize the record with fresh identity and series key.
    pub fn into_event(self, creator_id: Uuid) -> Event {
        let series_id = SeriesId::generate(&self.recurrence);

        Event {
            id: Uuid::now_v7(),
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            creator_id,
            participants: self.participants,
            recurrence: self.recurrence,
            series_id,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

/// Request body for `PUT /api/events/{id}`.
///
/// Only fields present in the body change. `updateScope` accepts
/// `thisEvent`, `thisAndFollowing` or `allEvents`; anything else means
/// `thisEvent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(custom(function = "title_not_blank"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub participants: Option<Vec<String>>,
    #[validate(nested)]
    pub recurrence: Option<RecurrenceInput>,
    #[schema(value_type = Option<MutationScope>)]
    pub update_scope: Option<serde_json::Value>,
}

impl UpdateEvent {
    pub fn scope(&self) -> MutationScope {
        MutationScope::from_selector(self.update_scope.as_ref())
    }

    /// Validate and normalize into a field-level patch.
    pub fn into_patch(self) -> Result<EventPatch, String> {
        self.validate().map_err(|e| describe_validation(&e))?;

        Ok(EventPatch {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| normalize_description(Some(d))),
            start_time: self.start_time.map(|t| t.trunc_subsecs(3)),
            end_time: self.end_time.map(|t| t.trunc_subsecs(3)),
            participants: self.participants.map(normalize_participants),
            recurrence: self.recurrence.map(RecurrenceInput::into_recurrence),
        })
    }
}

/// Request body for `DELETE /api/events/{id}`; the body may also be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    #[schema(value_type = Option<MutationScope>)]
    pub delete_scope: Option<serde_json::Value>,
}

/// Field-level changes applied to every event a selection matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub participants: Option<Vec<String>>,
    pub recurrence: Option<Recurrence>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge into `event`. Identity, creator and series key never change.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = Some(end_time);
        }
        if let Some(participants) = &self.participants {
            event.participants = participants.clone();
        }
        if let Some(recurrence) = &self.recurrence {
            event.recurrence = recurrence.clone();
        }
    }
}

/// Result of a scoped update or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MutationOutcome {
    pub message: String,
    pub scope: MutationScope,
    /// Number of stored events the selection matched
    pub affected: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventCreatedResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    pub message: String,
    pub events: Vec<Event>,
}

/// Trim and lowercase emails, dropping blanks and duplicates.
pub fn normalize_participants(participants: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(participants.len());
    for email in participants {
        let email = email.trim().to_lowercase();
        if !email.is_empty() && !normalized.contains(&email) {
            normalized.push(email);
        }
    }
    normalized
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Pick the client message for a failed validation.
///
/// Missing title or start time wins over recurrence problems.
fn describe_validation(errors: &ValidationErrors) -> String {
    let fields = errors.errors();

    // `required` carries no message of its own
    for field in ["title", "startTime", "start_time"] {
        if let Some(kind) = fields.get(field) {
            return kind_message(kind).unwrap_or_else(|| REQUIRED_FIELDS_MESSAGE.to_string());
        }
    }

    let mut rest: Vec<_> = fields.iter().collect();
    rest.sort_by(|a, b| a.0.cmp(b.0));
    rest.into_iter()
        .find_map(|(_, kind)| kind_message(kind))
        .unwrap_or_else(|| "Request validation failed".to_string())
}

fn kind_message(kind: &ValidationErrorsKind) -> Option<String> {
    match kind {
        ValidationErrorsKind::Field(errors) => errors
            .iter()
            .find_map(|e| e.message.as_ref().map(|m| m.to_string())),
        ValidationErrorsKind::Struct(inner) => {
            let mut nested: Vec<_> = inner.errors().iter().collect();
            // type problems read better than interval problems
            nested.sort_by(|a, b| b.0.cmp(a.0));
            nested.into_iter().find_map(|(_, kind)| kind_message(kind))
        }
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| {
            inner
                .errors()
                .values()
                .find_map(kind_message)
        }),
    }
}
