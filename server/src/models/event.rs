use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// A stored event. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub instagram_page: String,
}

/// Client-supplied event fields, used for both create and update.
///
/// Text fields default to empty when omitted or `null`; the timestamps are
/// required. An `id` in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instagram_page: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventValidationError {
    #[error("event payload is empty")]
    Empty,

    #[error("event title is required")]
    MissingTitle,
}

impl EventInput {
    /// True when no text field carries a value.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.location.is_empty()
            && self.instagram_page.is_empty()
    }

    /// Gate applied before an event is created.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.is_blank() {
            return Err(EventValidationError::Empty);
        }
        if self.title.is_empty() {
            return Err(EventValidationError::MissingTitle);
        }
        Ok(())
    }

    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            location: self.location,
            start_time: self.start_time,
            end_time: self.end_time,
            instagram_page: self.instagram_page,
        }
    }
}
