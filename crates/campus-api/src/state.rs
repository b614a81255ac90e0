//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use campus_auth::JwtDecoder;
use campus_core::config::AppConfig;
use campus_database::Stores;
use campus_realtime::RealtimeEngine;
use campus_service::{ConversationListAggregator, ConversationRegistry, MessageService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Durable stores (PostgreSQL or in-memory).
    pub stores: Stores,
    /// WebSocket realtime engine.
    pub realtime: RealtimeEngine,
    /// Bearer token verification.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Conversation lookup and pairing policy.
    pub registry: ConversationRegistry,
    /// Message send, history and read state.
    pub messages: Arc<MessageService>,
    /// Enriched conversation lists.
    pub aggregator: Arc<ConversationListAggregator>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Wires services, realtime engine and auth over the given stores.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone());
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let registry =
            ConversationRegistry::new(stores.conversations.clone(), stores.directory.clone());
        let messages = Arc::new(MessageService::new(
            stores.messages.clone(),
            registry.clone(),
            realtime.hub.clone(),
            config.messaging.max_content_length,
        ));
        let aggregator = Arc::new(ConversationListAggregator::new(
            stores.conversations.clone(),
            stores.messages.clone(),
            stores.directory.clone(),
            realtime.presence.clone(),
        ));

        Self {
            config: Arc::new(config),
            stores,
            realtime,
            jwt_decoder,
            registry,
            messages,
            aggregator,
            started_at: Instant::now(),
        }
    }
}
