//! Actor directory handler.

use axum::Json;
use axum::extract::{Query, State};

use campus_entity::ActorProfile;

use crate::dto::request::ActorsQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthActor;
use crate::state::AppState;

/// GET /api/actors?kind=
pub async fn list_actors(
    State(state): State<AppState>,
    _auth: AuthActor,
    Query(query): Query<ActorsQuery>,
) -> Result<Json<ApiResponse<Vec<ActorProfile>>>, ApiError> {
    let actors = state.stores.directory.list(query.kind).await?;
    Ok(Json(ApiResponse::ok(actors)))
}
