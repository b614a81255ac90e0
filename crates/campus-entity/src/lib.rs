//! # campus-entity
//!
//! Domain models for the campus messaging service. Persisted records
//! (`Conversation`, `Message`) and derived views (`EnrichedConversation`,
//! `PresenceSnapshot`) all derive `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod actor;
pub mod conversation;
pub mod message;
pub mod presence;

pub use actor::ActorProfile;
pub use conversation::{Conversation, ConversationDetail, EnrichedConversation};
pub use message::{Message, ReadReceipt};
pub use presence::{PresenceEntry, PresenceSnapshot};
