//! # campus-realtime
//!
//! Real-time layer of the campus messaging service. Provides:
//!
//! - The process-wide presence registry (who is online)
//! - WebSocket connection handles, pool, and heartbeat
//! - The broadcast hub that pushes new messages, read receipts, and
//!   presence snapshots to live sockets
//! - Wire frame types and engine metrics
//!
//! Delivery through this crate is best-effort and at-most-once. The
//! message store remains the system of record.

pub mod connection;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use hub::BroadcastHub;
pub use presence::registry::PresenceRegistry;
pub use server::RealtimeEngine;
