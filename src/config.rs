use std::env;

use url::Url;

use crate::error::JournalError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AppConfig {
    pub fn new(base_url: &str) -> Result<Self, JournalError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            username: None,
            password: None,
        })
    }

    pub fn from_env() -> Result<Self, JournalError> {
        let raw_base =
            env::var("TRIPJOURNAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = env_base_url(&raw_base)?;

        let username = non_empty_var("TRIPJOURNAL_USERNAME");
        let password = non_empty_var("TRIPJOURNAL_PASSWORD");

        Ok(Self {
            base_url,
            username,
            password,
        })
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_base_url(raw: &str) -> Result<Url, JournalError> {
    parse_base_url(raw).map_err(|err| match err {
        JournalError::Config(message) => {
            JournalError::Config(format!("TRIPJOURNAL_BASE_URL: {message}"))
        }
        other => other,
    })
}

/// Resource paths are joined under the base, so it must end with `/`.
fn parse_base_url(raw: &str) -> Result<Url, JournalError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|err| JournalError::Config(format!("invalid base URL {trimmed:?}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(JournalError::Config(format!(
            "{url} cannot be used as a base URL"
        )));
    }
    Ok(url)
}
