//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::{Connection, ConnectionState, Outbound};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// Display name to session IDs
    name_connections: DashMap<String, HashSet<String>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            name_connections: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new, not yet identified connection
    pub fn add_connection(&self, session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection.
    ///
    /// Returns the connection's name when it was the last live session for
    /// that name, so the caller can drop the name's relay subscription.
    pub async fn remove_connection(&self, session_id: &str) -> Option<String> {
        let (_, connection) = self.connections.remove(session_id)?;
        tracing::debug!(session_id = %session_id, "Connection removed");

        let name = connection.name().await?;
        if let Some(mut sessions) = self.name_connections.get_mut(&name) {
            sessions.remove(session_id);
        }

        // remove_if holds the shard lock, so a concurrent identify either
        // lands before (entry kept) or after (entry recreated)
        let emptied = self
            .name_connections
            .remove_if(&name, |_, sessions| sessions.is_empty())
            .is_some();

        emptied.then_some(name)
    }

    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Link a connection to a display name.
    ///
    /// Returns `false` when the session is unknown.
    pub async fn authenticate_connection(&self, session_id: &str, name: &str) -> bool {
        let Some(connection) = self.get_connection(session_id) else {
            return false;
        };

        connection.set_name(name).await;
        connection.set_state(ConnectionState::Connected).await;

        self.name_connections
            .entry(name.to_string())
            .or_default()
            .insert(session_id.to_string());

        tracing::debug!(session_id = %session_id, name = %name, "Connection authenticated");

        true
    }

    /// All live connections identified as `name`
    pub fn get_name_connections(&self, name: &str) -> Vec<Arc<Connection>> {
        self.name_connections
            .get(name)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch an event to every connection of `name`, returning how many accepted it
    pub async fn send_to_name(&self, name: &str, event_type: &str, data: &serde_json::Value) -> usize {
        let mut sent = 0;

        for conn in self.get_name_connections(name) {
            if conn.dispatch(event_type, data.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(name = %name, sent = sent, "Event sent to name connections");

        sent
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of distinct identified names
    pub fn name_count(&self) -> usize {
        self.name_connections.len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("names", &self.name_connections.len())
            .finish()
    }
}
