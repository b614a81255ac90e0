//! Route definitions for the campus messaging HTTP API.
//!
//! REST routes are mounted under `/api`; the WebSocket endpoint lives at
//! `/ws`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(conversation_routes())
        .merge(presence_routes())
        .merge(actor_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Conversations, messages and read state
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations)
                .post(handlers::conversation::open_conversation),
        )
        .route(
            "/conversations/{id}",
            get(handlers::conversation::get_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(handlers::message::history).post(handlers::message::send_message),
        )
        .route(
            "/conversations/{id}/read",
            post(handlers::message::mark_read),
        )
        .route(
            "/conversations/{id}/unread",
            get(handlers::message::unread_count),
        )
}

/// Online set
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/presence/online", get(handlers::presence::online))
        .route("/presence/entries", get(handlers::presence::entries))
}

/// Actor directory
fn actor_routes() -> Router<AppState> {
    Router::new().route("/actors", get(handlers::actor::list_actors))
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
