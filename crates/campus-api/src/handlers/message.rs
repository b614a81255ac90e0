//! Message handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use campus_entity::Message;

use crate::dto::request::{SendMessageRequest, validate_body};
use crate::dto::response::{ApiResponse, CountResponse, MarkReadResponse};
use crate::error::ApiError;
use crate::extractors::AuthActor;
use crate::state::AppState;

/// GET /api/conversations/{id}/messages
pub async fn history(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let messages = state.messages.history(&auth, id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// POST /api/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ApiError> {
    validate_body(&req)?;
    let message = state.messages.send(&auth, id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

/// POST /api/conversations/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MarkReadResponse>>, ApiError> {
    let receipt = state.messages.mark_as_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MarkReadResponse {
        conversation_id: receipt.conversation_id,
        updated_count: receipt.updated_count,
    })))
}

/// GET /api/conversations/{id}/unread
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.messages.unread_count(&auth, id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
