use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{codec::Iso8601, models::media::Media};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde_as(as = "Iso8601")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub medias: Vec<Media>,
    #[serde(default)]
    pub transition_from_previous: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCreate {
    pub trip_id: i64,
    pub name: String,
    pub note: Option<String>,
    #[serde_as(as = "Iso8601")]
    pub date: DateTime<Utc>,
    pub location: Option<Location>,
    pub transition_from_previous: Option<String>,
}

impl EventCreate {
    pub fn new(trip_id: i64, name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            trip_id,
            name: name.into(),
            note: None,
            date,
            location: None,
            transition_from_previous: None,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventUpdate {
    pub name: String,
    pub note: Option<String>,
    #[serde_as(as = "Iso8601")]
    pub date: DateTime<Utc>,
    pub location: Option<Location>,
    pub transition_from_previous: Option<String>,
}

impl From<&Event> for EventUpdate {
    fn from(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            note: event.note.clone(),
            date: event.date,
            location: event.location.clone(),
            transition_from_previous: event.transition_from_previous.clone(),
        }
    }
}
