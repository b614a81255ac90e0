//! # campus-core
//!
//! Core crate for the campus messaging service. Contains configuration
//! schemas, the [`Actor`](types::Actor) identity value type with its
//! canonical pair ordering, and the unified error system.
//!
//! This crate has **no** internal dependencies on other campus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::{Actor, ActorKind, PairKey};
