//! Presence handler.

use axum::Json;
use axum::extract::State;

use campus_entity::{PresenceEntry, PresenceSnapshot};

use crate::dto::response::ApiResponse;
use crate::extractors::AuthActor;
use crate::state::AppState;

/// GET /api/presence/online
pub async fn online(
    State(state): State<AppState>,
    _auth: AuthActor,
) -> Json<ApiResponse<PresenceSnapshot>> {
    Json(ApiResponse::ok(state.realtime.presence.snapshot()))
}

/// GET /api/presence/entries
pub async fn entries(
    State(state): State<AppState>,
    _auth: AuthActor,
) -> Json<ApiResponse<Vec<PresenceEntry>>> {
    Json(ApiResponse::ok(state.realtime.presence.entries()))
}
