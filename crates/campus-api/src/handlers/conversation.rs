//! Conversation handlers.

use axum::Json;
use axum::extract::{Path, State};

use campus_entity::{Conversation, ConversationDetail, EnrichedConversation};

use crate::dto::request::CreateConversationRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthActor;
use crate::state::AppState;

/// GET /api/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthActor,
) -> Result<Json<ApiResponse<Vec<EnrichedConversation>>>, ApiError> {
    let list = state.aggregator.list_for(auth.actor).await?;
    Ok(Json(ApiResponse::ok(list)))
}

/// POST /api/conversations
pub async fn open_conversation(
    State(state): State<AppState>,
    auth: AuthActor,
    Json(req): Json<CreateConversationRequest>,
) -> Result<Json<ApiResponse<Conversation>>, ApiError> {
    let conversation = state.registry.open_with(&auth, req.peer).await?;
    Ok(Json(ApiResponse::ok(conversation)))
}

/// GET /api/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ConversationDetail>>, ApiError> {
    let detail = state.registry.detail(&auth, id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}
