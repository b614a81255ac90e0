//! # campus-api
//!
//! HTTP API layer for campus messaging built on Axum.
//!
//! Provides the REST endpoints for conversations, messages, presence and
//! the actor directory, the WebSocket endpoint that carries live events,
//! middleware (CORS, request logging), the bearer-token extractor, DTOs,
//! and the mapping from [`AppError`](campus_core::AppError) to HTTP
//! responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, serve};
pub use error::ApiError;
pub use state::AppState;
