use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Trip,
    Event,
    Media,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Trip => "trip",
            EntityKind::Event => "event",
            EntityKind::Media => "media",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("could not decode response: {0}")]
    Decoding(serde_json::Error),
    #[error("could not encode request: {0}")]
    Encoding(serde_json::Error),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },
}

impl JournalError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        JournalError::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, JournalError::NotFound { .. })
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, JournalError::Authentication(_))
    }
}
