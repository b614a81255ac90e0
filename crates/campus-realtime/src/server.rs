//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use campus_core::config::RealtimeConfig;

use crate::connection::manager::ConnectionManager;
use crate::connection::pool::ConnectionPool;
use crate::hub::BroadcastHub;
use crate::metrics::EngineMetrics;
use crate::presence::registry::PresenceRegistry;

/// Central real-time engine, constructed once per server instance.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Connection lifecycle.
    pub connections: Arc<ConnectionManager>,
    /// Online set.
    pub presence: Arc<PresenceRegistry>,
    /// Event fan-out.
    pub hub: Arc<BroadcastHub>,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(EngineMetrics::new());
        let pool = Arc::new(ConnectionPool::new());
        let presence = Arc::new(PresenceRegistry::new());
        let hub = Arc::new(BroadcastHub::new(pool.clone(), metrics.clone()));
        let connections = Arc::new(ConnectionManager::new(
            config,
            pool,
            presence.clone(),
            hub.clone(),
            metrics.clone(),
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            presence,
            hub,
            metrics,
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for socket tasks.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
        info!("Real-time engine shut down");
    }
}
