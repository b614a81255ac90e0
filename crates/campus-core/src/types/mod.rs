//! Core type definitions used across the campus workspace.

pub mod actor;

pub use actor::{Actor, ActorKind, PairKey};
