//! # campus-database
//!
//! Durable storage for conversations, messages, and the actor directory.
//! The store traits in [`store`] have two implementations: PostgreSQL
//! repositories in [`repositories`] and process-local stores in
//! [`memory`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ActorDirectory, ConversationStore, MessageStore, Stores};
