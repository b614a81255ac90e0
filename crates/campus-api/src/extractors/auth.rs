//! `AuthActor` extractor: pulls the JWT from the Authorization header,
//! validates it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use campus_core::error::AppError;
use campus_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated actor context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthActor(pub RequestContext);

impl std::ops::Deref for AuthActor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let identity = state.jwt_decoder.authenticate(token)?;
        let ctx = RequestContext::new(identity.actor).with_display_name(identity.display_name);

        Ok(AuthActor(ctx))
    }
}
