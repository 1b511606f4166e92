//! Mutation scopes for recurring events.
//!
//! A scope turns the target event into a [`Selection`] over the stored
//! events. Selections compare series keys exactly and start times
//! inclusively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Event;
use crate::series::SeriesId;

/// Which events of a series an update or delete touches
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MutationScope {
    /// Only the target event
    #[default]
    ThisEvent,
    /// The target and every later event in its series
    ThisAndFollowing,
    /// Every event in the target's series
    AllEvents,
}

impl MutationScope {
    /// Read a client-supplied selector.
    ///
    /// Only the three exact names select a wider scope. Missing values,
    /// non-strings and unknown names all mean [`MutationScope::ThisEvent`].
    pub fn from_selector(selector: Option<&Value>) -> Self {
        match selector.and_then(Value::as_str) {
            Some("thisEvent") => Self::ThisEvent,
            Some("thisAndFollowing") => Self::ThisAndFollowing,
            Some("allEvents") => Self::AllEvents,
            _ => Self::ThisEvent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

/// Stored events a scoped mutation applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Record { id: Uuid },
    SeriesFrom { series_id: SeriesId, start_time: DateTime<Utc> },
    Series { series_id: SeriesId },
}

impl Selection {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::Record { id } => event.id == *id,
            Self::SeriesFrom { series_id, start_time } => {
                event.series_id == *series_id && event.start_time >= *start_time
            }
            Self::Series { series_id } => event.series_id == *series_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub selection: Selection,
    pub message: &'static str,
}

/// Resolve `scope` against the already loaded target event.
pub fn resolve(target: &Event, scope: MutationScope, mutation: Mutation) -> Resolution {
    let selection = match scope {
        MutationScope::ThisEvent => Selection::Record { id: target.id },
        MutationScope::ThisAndFollowing => Selection::SeriesFrom {
            series_id: target.series_id.clone(),
            start_time: target.start_time,
        },
        MutationScope::AllEvents => Selection::Series {
            series_id: target.series_id.clone(),
        },
    };

    let message = match (mutation, scope) {
        (Mutation::Update, MutationScope::ThisEvent) => "Event updated successfully.",
        (Mutation::Update, MutationScope::ThisAndFollowing) => {
            "This event and all following events updated successfully."
        }
        (Mutation::Update, MutationScope::AllEvents) => "All events in the series updated successfully.",
        (Mutation::Delete, MutationScope::ThisEvent) => "Event deleted successfully.",
        (Mutation::Delete, MutationScope::ThisAndFollowing) => {
            "This event and all following events deleted successfully."
        }
        (Mutation::Delete, MutationScope::AllEvents) => "All events in the series deleted successfully.",
    };

    Resolution { selection, message }
}
