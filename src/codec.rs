//! JSON wire format helpers.
//!
//! The journal API speaks snake_case JSON with ISO-8601 timestamps. Dates are
//! written in UTC with whole seconds and read leniently: RFC 3339 with or
//! without fractional seconds, naive timestamps (taken as UTC) and bare
//! calendar dates (taken as midnight UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

use crate::error::JournalError;

/// `serde_with` adapter for journal timestamps.
pub struct Iso8601;

impl SerializeAs<DateTime<Utc>> for Iso8601 {
    fn serialize_as<S>(source: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_iso8601(source))
    }
}

impl<'de> DeserializeAs<'de, DateTime<Utc>> for Iso8601 {
    fn deserialize_as<D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_iso8601(&raw).ok_or_else(|| {
            de::Error::custom(format!("invalid ISO-8601 timestamp: {raw:?}"))
        })
    }
}

pub fn format_iso8601(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, JournalError> {
    serde_json::from_slice(bytes).map_err(JournalError::Decoding)
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, JournalError> {
    serde_json::to_vec(value).map_err(JournalError::Encoding)
}

/// OAuth2 password-grant fields expected by the token endpoint.
pub fn password_grant_form(username: &str, password: &str) -> Vec<(&'static str, String)> {
    vec![
        ("grant_type", String::new()),
        ("username", username.to_string()),
        ("password", password.to_string()),
        ("scope", String::new()),
        ("client_id", String::new()),
        ("client_secret", String::new()),
    ]
}
