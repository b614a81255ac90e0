//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let store = match state.stores.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "degraded",
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            "unavailable"
        }
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if store == "connected" { "ok" } else { "degraded" }.to_string(),
        store_provider: state.stores.provider_name().to_string(),
        store: store.to_string(),
        ws_connections: state.realtime.connections.connection_count(),
        online_actors: state.realtime.presence.online_count(),
        realtime: state.realtime.metrics.snapshot(),
    }))
}
