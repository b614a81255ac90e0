//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use campus_core::{Actor, ActorKind};
use campus_core::error::AppError;

/// Open (or create) a conversation with a peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    /// The other participant.
    pub peer: Actor,
}

/// Send a message body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message text.
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// Filter for the actor directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorsQuery {
    /// Only actors of this kind.
    pub kind: Option<ActorKind>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message("Message content must not be empty".into()),
        );
    }
    Ok(())
}

/// Run `validator` rules and convert failures into a `Validation` error.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
