//! Shared fixtures for lookup integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use atlas_auth::{AuthError, MetadataPatch, Session, SessionEvent, SessionProvider};
use atlas_core::AppConfig;
use atlas_sources::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use std::sync::Mutex;
use tokio::sync::broadcast;

pub const PROFILE_ID: &str = "1610000000";

/// Config pointing every source at test hosts.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.breach.base_url = "https://breach.test/api/v2".to_string();
    config.breach.api_key = Some("test-key".to_string());
    config.profile.users_base_url = "https://users.test/v1".to_string();
    config.profile.thumbnails_base_url = "https://thumbs.test/v1".to_string();
    config.profile.friends_base_url = "https://friends.test/v1".to_string();
    config.profile.groups_base_url = "https://groups.test/v1".to_string();
    config
}

pub fn json(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: body.to_string(),
    })
}

pub fn html(status: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: "<html><body>404 Not Found</body></html>".to_string(),
    })
}

/// Transport answering by URL prefix and recording every request.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Vec<(String, Result<HttpResponse, String>)>,
    seen: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, reply: Result<HttpResponse, TransportError>) -> Self {
        self.routes
            .push((prefix.to_string(), reply.map_err(|e| e.0)));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.url.clone());
        match self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
        {
            Some((_, Ok(response))) => Ok(response.clone()),
            Some((_, Err(message))) => Err(TransportError(message.clone())),
            None => Err(TransportError(format!("no route for {}", request.url))),
        }
    }
}

/// Breach index answering every query with one hit.
pub fn breach_hit_transport() -> RecordingTransport {
    RecordingTransport::new().route(
        "https://breach.test/api/v2/query/",
        json(
            200,
            r#"{"success": true, "found": 1, "result": [
                {"sources": ["Collection #1"], "email": "neo@matrix.test", "password": "hunter2"}
            ]}"#,
        ),
    )
}

/// Profile platform with every sub-service answering.
pub fn full_profile_transport() -> RecordingTransport {
    RecordingTransport::new()
        .route(
            "https://users.test/v1/users/1610000000",
            json(
                200,
                r#"{"id": 1610000000, "name": "builderman_jr", "displayName": "Builder Jr",
                    "description": "hi", "created": "2019-06-01T12:30:00.123Z", "isBanned": false}"#,
            ),
        )
        .route(
            "https://thumbs.test/v1/users/avatar",
            json(200, r#"{"data": [{"imageUrl": "https://cdn.test/a.png"}]}"#),
        )
        .route(
            "https://friends.test/v1/users/1610000000/friends/count",
            json(200, r#"{"count": 12}"#),
        )
        .route(
            "https://friends.test/v1/users/1610000000/followers/count",
            json(200, r#"{"count": 340}"#),
        )
        .route(
            "https://friends.test/v1/users/1610000000/followings/count",
            json(200, r#"{"count": 8}"#),
        )
        .route(
            "https://groups.test/v1/users/1610000000/groups/roles",
            json(
                200,
                r#"{"data": [
                    {"group": {"id": 1, "name": "A"}, "role": {"name": "Owner", "rank": 255}},
                    {"group": {"id": 2, "name": "B"}, "role": {"name": "Member", "rank": 1}},
                    {"group": {"id": 3, "name": "C"}, "role": {"name": "Member", "rank": 1}},
                    {"group": {"id": 4, "name": "D"}, "role": {"name": "Member", "rank": 1}},
                    {"group": {"id": 5, "name": "E"}, "role": {"name": "Member", "rank": 1}}
                ]}"#,
            ),
        )
}

/// Session provider whose writes always fail.
pub struct UnreachableProvider {
    events: broadcast::Sender<SessionEvent>,
    pub attempts: Mutex<Vec<MetadataPatch>>,
}

impl UnreachableProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(4);
        Self {
            events,
            attempts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SessionProvider for UnreachableProvider {
    async fn get_session(&self) -> Option<Session> {
        None
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> atlas_auth::Result<Session> {
        Err(AuthError::Provider("backend unreachable".to_string()))
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: Option<&str>,
    ) -> atlas_auth::Result<Session> {
        Err(AuthError::Provider("backend unreachable".to_string()))
    }

    async fn sign_out(&self) -> atlas_auth::Result<()> {
        Ok(())
    }

    async fn update_metadata(&self, patch: MetadataPatch) -> atlas_auth::Result<Session> {
        self.attempts.lock().unwrap().push(patch);
        Err(AuthError::Provider("backend unreachable".to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// Session provider whose metadata writes never complete.
pub struct StalledProvider {
    events: broadcast::Sender<SessionEvent>,
}

impl StalledProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(4);
        Self { events }
    }
}

#[async_trait]
impl SessionProvider for StalledProvider {
    async fn get_session(&self) -> Option<Session> {
        None
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> atlas_auth::Result<Session> {
        std::future::pending().await
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: Option<&str>,
    ) -> atlas_auth::Result<Session> {
        std::future::pending().await
    }

    async fn sign_out(&self) -> atlas_auth::Result<()> {
        Ok(())
    }

    async fn update_metadata(&self, _patch: MetadataPatch) -> atlas_auth::Result<Session> {
        std::future::pending().await
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
