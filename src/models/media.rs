use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    #[serde(default)]
    pub url: Option<Url>,
}

/// Upload payload; the bytes travel base64-encoded.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCreate {
    pub event_id: i64,
    #[serde(rename = "base64_data")]
    #[serde_as(as = "Base64")]
    pub data: Vec<u8>,
}

impl MediaCreate {
    pub fn new(event_id: i64, data: impl Into<Vec<u8>>) -> Self {
        Self {
            event_id,
            data: data.into(),
        }
    }
}
