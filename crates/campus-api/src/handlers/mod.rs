//! HTTP and WebSocket request handlers, grouped by resource.

pub mod actor;
pub mod conversation;
pub mod health;
pub mod message;
pub mod presence;
pub mod ws;
