use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::{
    auth::AuthState,
    codec,
    config::AppConfig,
    error::JournalError,
    mirror::LocalMirror,
    models::{
        token::Credentials, Event, EventCreate, EventUpdate, Media, MediaCreate, Token, Trip,
        TripCreate, TripUpdate,
    },
    transport::{ApiRequest, ApiResponse, Endpoint, HttpTransport, Transport},
};

/// Client for the trip journal API that keeps a local mirror of the
/// caller's trips in sync with every accepted write.
#[derive(Clone)]
pub struct JournalService {
    transport: Arc<dyn Transport>,
    auth: Arc<AuthState>,
    mirror: Arc<RwLock<LocalMirror>>,
}

impl JournalService {
    pub fn new(config: &AppConfig) -> Result<Self, JournalError> {
        let transport = HttpTransport::new(config.base_url.clone())?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            auth: Arc::new(AuthState::new()),
            mirror: Arc::new(RwLock::new(LocalMirror::new())),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.auth.subscribe()
    }

    pub fn token(&self) -> Option<Token> {
        self.auth.token()
    }

    /// Snapshot of the mirrored trips in `start_date` order.
    pub async fn trips(&self) -> Vec<Trip> {
        self.mirror.read().await.trips()
    }

    pub async fn mirror(&self) -> LocalMirror {
        self.mirror.read().await.clone()
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Token, JournalError> {
        let body = codec::encode(&Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let request = ApiRequest::new(Method::POST, Endpoint::Register).json(body);
        self.authenticate(request).await
    }

    pub async fn log_in(&self, username: &str, password: &str) -> Result<Token, JournalError> {
        let request = ApiRequest::new(Method::POST, Endpoint::Token)
            .form(codec::password_grant_form(username, password));
        self.authenticate(request).await
    }

    pub fn log_out(&self) {
        self.auth.clear();
        info!("logged out");
    }

    pub async fn get_trips(&self) -> Result<Vec<Trip>, JournalError> {
        let request = self.authorized(Method::GET, Endpoint::Trips(None));
        let trips: Vec<Trip> = self.fetch(request).await?;

        let mut mirror = self.mirror.write().await;
        mirror.replace_all(trips);
        Ok(mirror.trips())
    }

    pub async fn create_trip(&self, trip: &TripCreate) -> Result<Trip, JournalError> {
        let request = self
            .authorized(Method::POST, Endpoint::Trips(None))
            .json(codec::encode(trip)?);
        let created: Trip = self.fetch(request).await?;

        self.mirror.write().await.insert_trip(created.clone());
        info!(trip_id = created.id, "trip created");
        Ok(created)
    }

    /// Detail read; does not touch the mirror.
    pub async fn get_trip(&self, id: i64) -> Result<Trip, JournalError> {
        let request = self.authorized(Method::GET, Endpoint::Trips(Some(id)));
        self.fetch(request).await
    }

    pub async fn update_trip(&self, id: i64, trip: &TripUpdate) -> Result<Trip, JournalError> {
        let request = self
            .authorized(Method::PUT, Endpoint::Trips(Some(id)))
            .json(codec::encode(trip)?);
        let mut updated: Trip = self.fetch(request).await?;
        updated.id = id;

        self.mirror
            .write()
            .await
            .replace_trip(updated.clone())
            .inspect_err(|_| warn!(trip_id = id, "updated trip is not mirrored locally"))?;
        info!(trip_id = id, "trip updated");
        Ok(updated)
    }

    pub async fn delete_trip(&self, id: i64) -> Result<(), JournalError> {
        let request = self.authorized(Method::DELETE, Endpoint::Trips(Some(id)));
        self.execute_delete(request).await?;

        if self.mirror.write().await.remove_trip(id).is_none() {
            warn!(trip_id = id, "deleted trip was not mirrored locally");
        }
        info!(trip_id = id, "trip deleted");
        Ok(())
    }

    pub async fn create_event(&self, event: &EventCreate) -> Result<Event, JournalError> {
        let request = self
            .authorized(Method::POST, Endpoint::Events(None))
            .json(codec::encode(event)?);
        let created: Event = self.fetch(request).await?;

        self.mirror
            .write()
            .await
            .append_event(event.trip_id, created.clone())
            .inspect_err(|_| warn!(trip_id = event.trip_id, "event created for unmirrored trip"))?;
        info!(event_id = created.id, trip_id = event.trip_id, "event created");
        Ok(created)
    }

    pub async fn update_event(&self, id: i64, event: &EventUpdate) -> Result<Event, JournalError> {
        let request = self
            .authorized(Method::PUT, Endpoint::Events(Some(id)))
            .json(codec::encode(event)?);
        let mut updated: Event = self.fetch(request).await?;
        updated.id = id;

        self.mirror
            .write()
            .await
            .replace_event(updated.clone())
            .inspect_err(|_| warn!(event_id = id, "updated event is not mirrored locally"))?;
        info!(event_id = id, "event updated");
        Ok(updated)
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), JournalError> {
        let request = self.authorized(Method::DELETE, Endpoint::Events(Some(id)));
        self.execute_delete(request).await?;

        self.mirror
            .write()
            .await
            .remove_event(id)
            .inspect_err(|_| warn!(event_id = id, "deleted event is not mirrored locally"))?;
        info!(event_id = id, "event deleted");
        Ok(())
    }

    pub async fn create_media(&self, media: &MediaCreate) -> Result<Media, JournalError> {
        let request = self
            .authorized(Method::POST, Endpoint::Media(None))
            .json(codec::encode(media)?);
        let created: Media = self.fetch(request).await?;

        self.mirror
            .write()
            .await
            .append_media(media.event_id, created.clone())
            .inspect_err(|_| warn!(event_id = media.event_id, "media created for unmirrored event"))?;
        info!(media_id = created.id, event_id = media.event_id, "media created");
        Ok(created)
    }

    pub async fn delete_media(&self, id: i64) -> Result<(), JournalError> {
        let request = self.authorized(Method::DELETE, Endpoint::Media(Some(id)));
        self.execute_delete(request).await?;

        self.mirror
            .write()
            .await
            .remove_media(id)
            .inspect_err(|_| warn!(media_id = id, "deleted media is not mirrored locally"))?;
        info!(media_id = id, "media deleted");
        Ok(())
    }

    fn authorized(&self, method: Method, endpoint: Endpoint) -> ApiRequest {
        ApiRequest::new(method, endpoint).bearer(self.auth.bearer())
    }

    async fn authenticate(&self, request: ApiRequest) -> Result<Token, JournalError> {
        let token: Token = self.fetch(request).await?;
        self.auth.store(token.clone());
        Ok(token)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, JournalError> {
        let response = self.execute(request).await?;
        codec::decode(&response.body)
    }

    /// A 404 from the server means the entity is already gone, so the local
    /// removal still applies.
    async fn execute_delete(&self, request: ApiRequest) -> Result<(), JournalError> {
        let endpoint = request.endpoint;
        match self.execute(request).await {
            Err(err) if err.is_not_found() => {
                info!(%endpoint, "entity was already deleted on the server");
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, JournalError> {
        let endpoint = request.endpoint;
        let response = self.transport.send(request).await?;
        if response.status == StatusCode::UNAUTHORIZED {
            warn!(%endpoint, "journal API rejected credentials");
            return Err(JournalError::Authentication(response.text()));
        }
        if response.status == StatusCode::NOT_FOUND {
            if let Some((kind, id)) = endpoint.target() {
                warn!(%endpoint, "journal API does not know this {kind}");
                return Err(JournalError::not_found(kind, id));
            }
        }
        if !response.status.is_success() {
            warn!(%endpoint, status = %response.status, "journal API returned an error");
            return Err(JournalError::UnexpectedStatus {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, net::TcpListener, sync::Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use url::Url;

    use super::*;
    use crate::{error::EntityKind, transport::Payload};

    /// `None` stands for a server that cannot be reached.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Option<ApiResponse>>>,
        sent: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn reply(&self, status: StatusCode, body: Value) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Some(ApiResponse::new(status, body.to_string())));
        }

        fn reply_raw(&self, status: StatusCode, body: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Some(ApiResponse::new(status, body)));
        }

        fn unreachable(&self) {
            self.replies.lock().unwrap().push_back(None);
        }

        fn last(&self) -> ApiRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JournalError> {
            self.sent.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left");
            match reply {
                Some(response) => Ok(response),
                None => closed_port_transport().send(request).await,
            }
        }
    }

    /// Real HTTP transport aimed at a port nobody listens on.
    fn closed_port_transport() -> HttpTransport {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        HttpTransport::new(Url::parse(&format!("http://{addr}/")).unwrap()).unwrap()
    }

    fn service() -> (JournalService, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::default());
        (JournalService::with_transport(transport.clone()), transport)
    }

    fn trip_json(id: i64, start: &str) -> Value {
        json!({
            "id": id,
            "name": format!("trip {id}"),
            "start_date": start,
            "end_date": "2024-12-31T00:00:00Z",
            "events": []
        })
    }

    fn event_json(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "note": null,
            "date": "2024-02-01T10:00:00Z",
            "location": {"latitude": 1.5, "longitude": 2.5, "address": null},
            "medias": [],
            "transition_from_previous": null
        })
    }

    fn new_trip(name: &str, day: u32) -> TripCreate {
        TripCreate::new(
            name,
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, day + 2, 0, 0, 0).unwrap(),
        )
    }

    async fn logged_in() -> (JournalService, Arc<ScriptedTransport>) {
        let (service, transport) = service();
        transport.reply(
            StatusCode::OK,
            json!({"access_token": "tok", "token_type": "bearer"}),
        );
        service.log_in("ana", "pw").await.unwrap();
        (service, transport)
    }

    async fn with_trips(trips: Vec<Value>) -> (JournalService, Arc<ScriptedTransport>) {
        let (service, transport) = logged_in().await;
        transport.reply(StatusCode::OK, Value::Array(trips));
        service.get_trips().await.unwrap();
        (service, transport)
    }

    #[tokio::test]
    async fn log_in_posts_password_grant_form() {
        let (service, transport) = logged_in().await;
        let request = transport.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.endpoint, Endpoint::Token);
        assert!(request.bearer.is_none());
        let Payload::Form(fields) = request.payload else {
            panic!("expected form payload");
        };
        assert!(fields.contains(&("username", "ana".to_string())));
        assert!(service.is_authenticated());
    }

    #[tokio::test]
    async fn register_posts_json_credentials() {
        let (service, transport) = service();
        transport.reply(
            StatusCode::OK,
            json!({"access_token": "new", "token_type": "bearer"}),
        );
        let token = service.register("ana", "pw").await.unwrap();
        assert_eq!(token.access_token, "new");

        let request = transport.last();
        assert_eq!(request.endpoint, Endpoint::Register);
        let Payload::Json(body) = request.payload else {
            panic!("expected json payload");
        };
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"username": "ana", "password": "pw"}));
    }

    #[tokio::test]
    async fn rejected_login_carries_server_message() {
        let (service, transport) = service();
        transport.reply_raw(StatusCode::UNAUTHORIZED, r#"{"detail":"Incorrect username"}"#);
        let err = service.log_in("ana", "bad").await.unwrap_err();
        match err {
            JournalError::Authentication(message) => assert!(message.contains("Incorrect")),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn malformed_token_is_decoding_error() {
        let (service, transport) = service();
        transport.reply_raw(StatusCode::OK, "not json");
        let err = service.register("ana", "pw").await.unwrap_err();
        assert!(matches!(err, JournalError::Decoding(_)));
        assert!(service.token().is_none());
    }

    #[tokio::test]
    async fn requests_after_logout_have_no_bearer() {
        let (service, transport) = logged_in().await;
        transport.reply(StatusCode::OK, json!([]));
        service.get_trips().await.unwrap();
        assert_eq!(transport.last().bearer.as_deref(), Some("tok"));

        service.log_out();
        transport.reply(StatusCode::OK, json!([]));
        service.get_trips().await.unwrap();
        assert!(transport.last().bearer.is_none());
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn get_trips_orders_by_start_date() {
        let (service, _) = with_trips(vec![
            trip_json(1, "2024-01-05"),
            trip_json(2, "2024-01-01"),
        ])
        .await;
        let ids: Vec<_> = service.trips().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn create_trip_adds_exactly_one_sorted_trip() {
        let (service, transport) = with_trips(vec![
            trip_json(1, "2024-01-01T00:00:00Z"),
            trip_json(2, "2024-01-20T00:00:00Z"),
        ])
        .await;
        transport.reply(StatusCode::OK, trip_json(3, "2024-01-10T00:00:00Z"));
        let created = service.create_trip(&new_trip("Mid", 10)).await.unwrap();
        assert_eq!(created.id, 3);

        let request = transport.last();
        let Payload::Json(body) = request.payload else {
            panic!("expected json payload");
        };
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["start_date"], "2024-01-10T00:00:00Z");

        let ids: Vec<_> = service.trips().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn get_trip_is_read_through() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        let mut remote = trip_json(1, "2024-01-01");
        remote["name"] = json!("changed on server");
        transport.reply(StatusCode::OK, remote);

        let fetched = service.get_trip(1).await.unwrap();
        assert_eq!(fetched.name, "changed on server");
        assert_eq!(service.trips().await[0].name, "trip 1");
        assert_eq!(transport.last().endpoint, Endpoint::Trips(Some(1)));
    }

    #[tokio::test]
    async fn update_trip_replaces_in_place() {
        let (service, transport) = with_trips(vec![
            trip_json(1, "2024-01-01"),
            trip_json(2, "2024-01-05"),
        ])
        .await;
        let mut remote = trip_json(1, "2024-02-01");
        remote["name"] = json!("Later");
        transport.reply(StatusCode::OK, remote);

        service.update_trip(1, &new_trip("Later", 1)).await.unwrap();
        let trips = service.trips().await;
        assert_eq!(trips[1].id, 1);
        assert_eq!(trips[1].name, "Later");
        assert_eq!(transport.last().method, Method::PUT);
    }

    #[tokio::test]
    async fn update_unknown_trip_is_not_found() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        let before = service.trips().await;
        transport.reply(StatusCode::OK, trip_json(9, "2024-01-03"));
        let err = service.update_trip(9, &new_trip("x", 3)).await.unwrap_err();
        assert!(matches!(
            err,
            JournalError::NotFound { kind: EntityKind::Trip, id: 9 }
        ));
        assert_eq!(service.trips().await, before);
    }

    #[tokio::test]
    async fn delete_trip_ignores_unknown_ids() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        transport.reply_raw(StatusCode::NO_CONTENT, "");
        service.delete_trip(42).await.unwrap();
        assert_eq!(service.trips().await.len(), 1);

        transport.reply_raw(StatusCode::OK, "");
        service.delete_trip(1).await.unwrap();
        assert!(service.trips().await.is_empty());
        assert_eq!(transport.last().endpoint, Endpoint::Trips(Some(1)));
    }

    #[tokio::test]
    async fn unauthorized_write_leaves_mirror_alone() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        let before = service.trips().await;
        transport.reply_raw(StatusCode::UNAUTHORIZED, "expired");
        let err = service.delete_trip(1).await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(service.trips().await, before);
    }

    #[tokio::test]
    async fn server_errors_are_typed() {
        let (service, transport) = logged_in().await;
        transport.reply_raw(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":"bad date"}"#);
        let err = service.create_trip(&new_trip("x", 1)).await.unwrap_err();
        assert!(matches!(
            err,
            JournalError::UnexpectedStatus { status: 422, .. }
        ));
    }

    #[tokio::test]
    async fn server_side_404_is_not_found() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Event not found"}"#);
        let err = service.delete_event(8).await.unwrap_err();
        assert!(matches!(
            err,
            JournalError::NotFound { kind: EntityKind::Event, id: 8 }
        ));

        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Trip not found"}"#);
        let err = service.get_trip(3).await.unwrap_err();
        assert!(matches!(
            err,
            JournalError::NotFound { kind: EntityKind::Trip, id: 3 }
        ));

        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#);
        let err = service.get_trips().await.unwrap_err();
        assert!(matches!(err, JournalError::UnexpectedStatus { status: 404, .. }));
        assert_eq!(service.trips().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_trip_already_gone_on_server_clears_mirror() {
        let (service, transport) = with_trips(vec![
            trip_json(1, "2024-01-01"),
            trip_json(2, "2024-01-05"),
        ])
        .await;
        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Trip not found"}"#);
        service.delete_trip(1).await.unwrap();
        let ids: Vec<_> = service.trips().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn delete_event_already_gone_on_server_clears_mirror() {
        let mut trip = trip_json(1, "2024-01-01");
        trip["events"] = json!([event_json(10, "Beach"), event_json(11, "Dinner")]);
        let (service, transport) = with_trips(vec![trip]).await;

        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Event not found"}"#);
        service.delete_event(10).await.unwrap();
        let events: Vec<_> = service.trips().await[0].events.iter().map(|e| e.id).collect();
        assert_eq!(events, vec![11]);
        assert!(service.mirror().await.event(10).is_none());
    }

    #[tokio::test]
    async fn delete_media_already_gone_on_server_clears_mirror() {
        let mut event = event_json(10, "Beach");
        event["medias"] = json!([{"id": 100, "url": null}]);
        let mut trip = trip_json(1, "2024-01-01");
        trip["events"] = json!([event]);
        let (service, transport) = with_trips(vec![trip]).await;

        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Media not found"}"#);
        service.delete_media(100).await.unwrap();
        assert!(service.trips().await[0].events[0].medias.is_empty());

        transport.reply_raw(StatusCode::NOT_FOUND, r#"{"detail":"Media not found"}"#);
        let err = service.delete_media(100).await.unwrap_err();
        assert!(matches!(
            err,
            JournalError::NotFound { kind: EntityKind::Media, id: 100 }
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        let before = service.trips().await;

        transport.unreachable();
        let err = service.get_trips().await.unwrap_err();
        assert!(matches!(err, JournalError::Network(_)));

        transport.unreachable();
        let err = service.delete_trip(1).await.unwrap_err();
        assert!(matches!(err, JournalError::Network(_)));

        assert_eq!(service.trips().await, before);
        assert!(service.is_authenticated());
    }

    #[tokio::test]
    async fn malformed_crud_bodies_are_decoding_errors() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        let before = service.trips().await;

        transport.reply_raw(StatusCode::OK, "not json");
        let err = service.get_trips().await.unwrap_err();
        assert!(matches!(err, JournalError::Decoding(_)));

        transport.reply_raw(StatusCode::OK, "not json");
        let err = service.create_trip(&new_trip("Broken", 3)).await.unwrap_err();
        assert!(matches!(err, JournalError::Decoding(_)));

        transport.reply(StatusCode::OK, json!({"id": 1, "name": "missing dates"}));
        let err = service.update_trip(1, &new_trip("x", 1)).await.unwrap_err();
        assert!(matches!(err, JournalError::Decoding(_)));

        assert_eq!(service.trips().await, before);
    }

    #[tokio::test]
    async fn event_lifecycle_patches_owning_trip() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;

        transport.reply(StatusCode::OK, event_json(10, "Museum"));
        let mut create = EventCreate::new(1, "Museum", Utc::now());
        create.note = Some("bring tickets".into());
        service.create_event(&create).await.unwrap();
        assert_eq!(service.trips().await[0].events[0].name, "Museum");

        let Payload::Json(body) = transport.last().payload else {
            panic!("expected json payload");
        };
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["trip_id"], 1);

        transport.reply(StatusCode::OK, event_json(10, "Gallery"));
        let update = EventUpdate::from(&service.trips().await[0].events[0]);
        service.update_event(10, &update).await.unwrap();
        assert_eq!(service.trips().await[0].events[0].name, "Gallery");

        transport.reply_raw(StatusCode::OK, "");
        service.delete_event(10).await.unwrap();
        assert!(service.trips().await[0].events.is_empty());

        transport.reply_raw(StatusCode::OK, "");
        let err = service.delete_event(10).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_event_for_unknown_trip_is_not_found() {
        let (service, transport) = with_trips(vec![]).await;
        transport.reply(StatusCode::OK, event_json(10, "Orphan"));
        let err = service
            .create_event(&EventCreate::new(5, "Orphan", Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JournalError::NotFound { kind: EntityKind::Trip, id: 5 }
        ));
    }

    #[tokio::test]
    async fn update_unknown_event_returns_error() {
        let (service, transport) = with_trips(vec![trip_json(1, "2024-01-01")]).await;
        transport.reply(StatusCode::OK, event_json(77, "ghost"));
        let update = EventUpdate {
            name: "ghost".into(),
            note: None,
            date: Utc::now(),
            location: None,
            transition_from_previous: None,
        };
        let err = service.update_event(77, &update).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn media_attach_and_detach() {
        let mut trip = trip_json(1, "2024-01-01");
        trip["events"] = json!([event_json(10, "Beach")]);
        let (service, transport) = with_trips(vec![trip]).await;

        transport.reply(
            StatusCode::OK,
            json!({"id": 100, "url": "http://localhost:8000/media/100.jpg"}),
        );
        let media = service
            .create_media(&MediaCreate::new(10, b"jpeg".to_vec()))
            .await
            .unwrap();
        assert_eq!(media.id, 100);
        assert_eq!(service.trips().await[0].events[0].medias.len(), 1);

        transport.reply_raw(StatusCode::OK, "");
        service.delete_media(100).await.unwrap();
        assert!(service.trips().await[0].events[0].medias.is_empty());

        transport.reply_raw(StatusCode::OK, "");
        assert!(service.delete_media(100).await.unwrap_err().is_not_found());

        transport.reply(StatusCode::OK, json!({"id": 101, "url": null}));
        let err = service
            .create_media(&MediaCreate::new(55, b"png".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JournalError::NotFound { kind: EntityKind::Event, id: 55 }
        ));
    }
}
