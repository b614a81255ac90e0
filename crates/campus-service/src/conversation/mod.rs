//! Conversation registry.

pub mod registry;

pub use registry::ConversationRegistry;
