//! WebSocket wire frames and validation.

pub mod types;
pub mod validator;

pub use types::{InboundMessage, OutboundMessage};
