use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{codec::Iso8601, models::event::Event};

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub name: String,
    #[serde_as(as = "Iso8601")]
    pub start_date: DateTime<Utc>,
    #[serde_as(as = "Iso8601")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCreate {
    pub name: String,
    #[serde_as(as = "Iso8601")]
    pub start_date: DateTime<Utc>,
    #[serde_as(as = "Iso8601")]
    pub end_date: DateTime<Utc>,
}

impl TripCreate {
    pub fn new(name: impl Into<String>, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
        }
    }
}

pub type TripUpdate = TripCreate;
