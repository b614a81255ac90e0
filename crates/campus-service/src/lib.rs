//! # campus-service
//!
//! Messaging use cases for the campus service. Each service works against
//! the store traits of `campus-database` and pushes live events through
//! the `campus-realtime` broadcast hub.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod aggregator;
pub mod context;
pub mod conversation;
pub mod message;

pub use aggregator::ConversationListAggregator;
pub use context::RequestContext;
pub use conversation::ConversationRegistry;
pub use message::MessageService;
