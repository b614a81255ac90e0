//! Conversation domain entities.

pub mod enriched;
pub mod model;

pub use enriched::{ConversationDetail, EnrichedConversation};
pub use model::Conversation;
