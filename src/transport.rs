use std::fmt;

use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use tracing::debug;
use url::Url;

use crate::error::{EntityKind, JournalError};

const JSON_CONTENT_TYPE: &str = "application/json";
const USER_AGENT: &str = concat!("tripjournal/", env!("CARGO_PKG_VERSION"));

/// Resource addressed below the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Token,
    Trips(Option<i64>),
    Events(Option<i64>),
    Media(Option<i64>),
}

impl Endpoint {
    pub fn path(&self) -> String {
        let (domain, id) = match self {
            Endpoint::Register => return "register".to_string(),
            Endpoint::Token => return "token".to_string(),
            Endpoint::Trips(id) => ("trips", id),
            Endpoint::Events(id) => ("events", id),
            Endpoint::Media(id) => ("media", id),
        };
        match id {
            Some(id) => format!("{domain}/{id}"),
            None => domain.to_string(),
        }
    }

    /// The single entity an id-addressed endpoint points at.
    pub fn target(&self) -> Option<(EntityKind, i64)> {
        match *self {
            Endpoint::Trips(Some(id)) => Some((EntityKind::Trip, id)),
            Endpoint::Events(Some(id)) => Some((EntityKind::Event, id)),
            Endpoint::Media(Some(id)) => Some((EntityKind::Media, id)),
            _ => None,
        }
    }

    pub fn url(&self, base: &Url) -> Result<Url, JournalError> {
        Ok(base.join(&self.path())?)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Vec<u8>),
    Form(Vec<(&'static str, String)>),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub payload: Payload,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            payload: Payload::Empty,
            bearer: None,
        }
    }

    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    pub fn form(mut self, fields: Vec<(&'static str, String)>) -> Self {
        self.payload = Payload::Form(fields);
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// GET and DELETE never carry a body.
    pub fn carries_body(&self) -> bool {
        self.method != Method::GET && self.method != Method::DELETE
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        let text = String::from_utf8_lossy(&self.body).trim().to_string();
        if text.is_empty() {
            "Unknown error".to_string()
        } else {
            text
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JournalError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Result<Self, JournalError> {
        let client = build_client(USER_AGENT)?;
        Ok(Self { client, base_url })
    }
}

fn build_client(user_agent: &str) -> Result<Client, JournalError> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|err| JournalError::Config(format!("could not build HTTP client: {err}")))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JournalError> {
        let url = request.endpoint.url(&self.base_url)?;
        debug!(
            method = %request.method,
            endpoint = %request.endpoint,
            authorized = request.bearer.is_some(),
            "sending journal request"
        );

        let carries_body = request.carries_body();
        let mut builder = self.client.request(request.method, url);
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder = match request.payload {
            Payload::Form(fields) if carries_body => builder.form(&fields),
            Payload::Json(body) if carries_body => {
                builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body)
            }
            _ => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(%status, bytes = body.len(), "journal response received");
        Ok(ApiResponse { status, body })
    }
}
