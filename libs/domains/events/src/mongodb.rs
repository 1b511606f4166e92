//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{Event, EventPatch, Recurrence, RecurrenceType};
use crate::repository::EventRepository;
use crate::scope::Selection;
use crate::series::SeriesId;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

pub const EVENTS_COLLECTION: &str = "events";

/// Stored shape of an event.
///
/// Times are BSON datetimes so range filters compare chronologically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start_time: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<bson::DateTime>,
    creator_id: String,
    #[serde(default)]
    participants: Vec<String>,
    #[serde(default)]
    recurrence: RecurrenceDocument,
    series_id: String,
    created_at: bson::DateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecurrenceDocument {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until: Option<bson::DateTime>,
}

fn to_bson_datetime(dt: chrono::DateTime<chrono::Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime, field: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(dt.timestamp_millis())
        .ok_or_else(|| EventError::Corrupt(format!("{field} out of range")))
}

impl From<&Recurrence> for RecurrenceDocument {
    fn from(recurrence: &Recurrence) -> Self {
        Self {
            kind: recurrence.kind.to_string(),
            interval: recurrence.interval.map(i64::from),
            until: recurrence.until.map(to_bson_datetime),
        }
    }
}

impl RecurrenceDocument {
    fn into_recurrence(self) -> Result<Recurrence> {
        let kind = if self.kind.is_empty() {
            RecurrenceType::None
        } else {
            RecurrenceType::from_str(&self.kind)
                .map_err(|_| EventError::Corrupt(format!("unknown recurrence type {:?}", self.kind)))?
        };
        let interval = self
            .interval
            .map(|i| {
                u32::try_from(i)
                    .map_err(|_| EventError::Corrupt(format!("invalid recurrence interval {i}")))
            })
            .transpose()?;
        let until = self
            .until
            .map(|u| from_bson_datetime(u, "recurrence.until"))
            .transpose()?;

        Ok(Recurrence {
            kind,
            interval,
            until,
        })
    }

    fn to_document(&self) -> Document {
        let mut document = doc! { "type": self.kind.as_str() };
        if let Some(interval) = self.interval {
            document.insert("interval", interval);
        }
        if let Some(until) = self.until {
            document.insert("until", until);
        }
        document
    }
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: to_bson_datetime(event.start_time),
            end_time: event.end_time.map(to_bson_datetime),
            creator_id: event.creator_id.to_string(),
            participants: event.participants.clone(),
            recurrence: RecurrenceDocument::from(&event.recurrence),
            series_id: event.series_id.as_str().to_string(),
            created_at: to_bson_datetime(event.created_at),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(document: EventDocument) -> Result<Self> {
        let id = Uuid::parse_str(&document.id)
            .map_err(|e| EventError::Corrupt(format!("invalid _id {:?}: {e}", document.id)))?;
        let creator_id = Uuid::parse_str(&document.creator_id).map_err(|e| {
            EventError::Corrupt(format!("invalid creatorId on event {id}: {e}"))
        })?;

        Ok(Event {
            id,
            title: document.title,
            description: document.description,
            start_time: from_bson_datetime(document.start_time, "startTime")?,
            end_time: document
                .end_time
                .map(|t| from_bson_datetime(t, "endTime"))
                .transpose()?,
            creator_id,
            participants: document.participants,
            recurrence: document.recurrence.into_recurrence()?,
            series_id: SeriesId::from_stored(document.series_id),
            created_at: from_bson_datetime(document.created_at, "createdAt")?,
        })
    }
}

fn selection_filter(selection: &Selection) -> Document {
    match selection {
        Selection::Record { id } => doc! { "_id": id.to_string() },
        Selection::SeriesFrom {
            series_id,
            start_time,
        } => doc! {
            "seriesId": series_id.as_str(),
            "startTime": { "$gte": to_bson_datetime(*start_time) },
        },
        Selection::Series { series_id } => doc! { "seriesId": series_id.as_str() },
    }
}

fn visible_filter(user_id: Uuid, email: &str) -> Document {
    doc! {
        "$or": [
            { "creatorId": user_id.to_string() },
            { "participants": email },
        ]
    }
}

/// `$set` body for a patch. Identity, creator and series key are never written.
fn set_document(patch: &EventPatch) -> Document {
    let mut set = Document::new();

    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    match &patch.description {
        Some(Some(description)) => {
            set.insert("description", description.as_str());
        }
        Some(None) => {
            set.insert("description", Bson::Null);
        }
        None => {}
    }
    if let Some(start_time) = patch.start_time {
        set.insert("startTime", to_bson_datetime(start_time));
    }
    if let Some(end_time) = patch.end_time {
        set.insert("endTime", to_bson_datetime(end_time));
    }
    if let Some(participants) = &patch.participants {
        set.insert("participants", participants.clone());
    }
    if let Some(recurrence) = &patch.recurrence {
        set.insert(
            "recurrence",
            RecurrenceDocument::from(recurrence).to_document(),
        );
    }

    set
}

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(EVENTS_COLLECTION),
        }
    }

    /// Create the indexes scoped mutations and listing rely on
    pub async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            // thisAndFollowing and allEvents selections
            IndexModel::builder()
                .keys(doc! { "seriesId": 1, "startTime": 1 })
                .build(),
            IndexModel::builder().keys(doc! { "creatorId": 1 }).build(),
            IndexModel::builder().keys(doc! { "participants": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id, series_id = %event.series_id))]
    async fn create(&self, event: Event) -> Result<Event> {
        self.collection
            .insert_one(EventDocument::from(&event))
            .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await?
            .map(Event::try_from)
            .transpose()
    }

    #[instrument(skip(self, email))]
    async fn find_visible(&self, user_id: Uuid, email: &str) -> Result<Vec<Event>> {
        let options = FindOptions::builder()
            .sort(doc! { "startTime": 1 })
            .build();

        let cursor = self
            .collection
            .find(visible_filter(user_id, email))
            .with_options(options)
            .await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;

        documents.into_iter().map(Event::try_from).collect()
    }

    #[instrument(skip(self, patch))]
    async fn update_many(&self, selection: &Selection, patch: &EventPatch) -> Result<u64> {
        let set = set_document(patch);
        if set.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .update_many(selection_filter(selection), doc! { "$set": set })
            .await?;
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete_many(&self, selection: &Selection) -> Result<u64> {
        let result = self
            .collection
            .delete_many(selection_filter(selection))
            .await?;
        Ok(result.deleted_count)
    }
}
