//! Connection pool: all active connections indexed by actor and by ID.

use std::sync::Arc;

use dashmap::DashMap;

use campus_core::Actor;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Actor → connection handles in registration order (oldest first).
    by_actor: DashMap<Actor, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_actor.entry(handle.actor).or_default().push(handle);
    }

    /// Removes a connection from the pool.
    ///
    /// Returns `None` if the connection was already removed.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        self.by_actor.remove_if_mut(&handle.actor, |_, connections| {
            connections.retain(|c| c.id != *conn_id);
            connections.is_empty()
        });
        Some(handle)
    }

    /// Gets all connections for an actor, oldest first.
    pub fn actor_connections(&self, actor: &Actor) -> Vec<Arc<ConnectionHandle>> {
        self.by_actor
            .get(actor)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(actor: Actor) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(4);
        Arc::new(ConnectionHandle::new(actor, tx))
    }

    #[test]
    fn test_add_and_remove() {
        let pool = ConnectionPool::new();
        let a = Actor::operator(7);
        let first = handle(a);
        let second = handle(a);
        pool.add(first.clone());
        pool.add(second.clone());

        assert_eq!(pool.connection_count(), 2);
        assert_eq!(pool.actor_connections(&a)[0].id, first.id);

        assert!(pool.remove(&first.id).is_some());
        assert!(pool.remove(&first.id).is_none());
        assert_eq!(pool.actor_connections(&a).len(), 1);

        pool.remove(&second.id);
        assert!(pool.actor_connections(&a).is_empty());
        assert_eq!(pool.connection_count(), 0);
    }
}
