//! Series keys group the occurrences of one recurring event.
//!
//! A standalone event gets a 24-character ObjectId hex key. A recurring
//! event gets a hyphenated UUID, which is 36 characters. The key is
//! generated once on creation and never changes.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Recurrence;

const SERIES_KEY_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "0b6f0d36-3c0e-4f7a-9a1e-6f2d7c9b4e21")]
pub struct SeriesId(String);

impl SeriesId {
    /// Key for a newly created event.
    pub fn generate(recurrence: &Recurrence) -> Self {
        if recurrence.kind.is_recurring() {
            Self::recurring()
        } else {
            Self::standalone()
        }
    }

    pub fn standalone() -> Self {
        Self(ObjectId::new().to_hex())
    }

    pub fn recurring() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Wrap a key read back from storage.
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// True for keys minted for recurring events.
    pub fn is_series_key(&self) -> bool {
        self.0.len() == SERIES_KEY_LEN && Uuid::try_parse(&self.0).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
