//! Durable store backend selection.

use serde::{Deserialize, Serialize};

/// Which implementation backs the conversation and message stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// PostgreSQL through sqlx.
    #[default]
    Postgres,
    /// Process-local maps. Lost on restart.
    Memory,
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Backend provider.
    #[serde(default)]
    pub provider: StoreProvider,
}
