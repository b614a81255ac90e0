//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use campus_api::{AppState, build_app};
use campus_auth::JwtEncoder;
use campus_core::Actor;
use campus_core::config::AppConfig;
use campus_database::Stores;
use campus_entity::ActorProfile;

/// Test application running against in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct access to services and the realtime engine
    pub state: AppState,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(AppConfig::in_memory())
    }

    /// Create a test application with adjusted configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config.clone(), Stores::memory());
        let router = build_app(state.clone());
        let encoder = JwtEncoder::new(&config.auth);

        Self {
            router,
            state,
            config,
            encoder,
        }
    }

    /// Mint a bearer token for `actor`
    pub fn token(&self, actor: Actor) -> String {
        self.encoder.issue(actor, None).expect("Failed to issue token")
    }

    /// Mint a bearer token that carries a display name
    pub fn token_named(&self, actor: Actor, name: &str) -> String {
        self.encoder
            .issue(actor, Some(name))
            .expect("Failed to issue token")
    }

    /// Register a display name in the directory
    pub async fn seed_profile(&self, actor: Actor, name: &str) {
        self.state
            .stores
            .directory
            .upsert(&ActorProfile::new(actor, name))
            .await
            .expect("Failed to seed profile");
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Open (or fetch) the conversation between the token's actor and `peer`
    pub async fn open_conversation(&self, token: &str, peer: Actor) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/conversations",
                Some(serde_json::json!({ "peer": peer })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]["id"]
            .as_i64()
            .expect("conversation id")
    }

    /// Send a message and return the stored message JSON
    pub async fn send(&self, token: &str, conversation_id: i64, content: &str) -> Value {
        let response = self
            .request(
                "POST",
                &format!("/api/conversations/{conversation_id}/messages"),
                Some(serde_json::json!({ "content": content })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"].clone()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of a failed response
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
