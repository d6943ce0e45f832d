//! Individual WebSocket connection

use crate::protocol::{CloseCode, GatewayMessage};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Connection established, waiting for Identify
    Connecting,
    /// Successfully identified
    Connected,
    Disconnected,
}

/// Frame queued for the socket writer
#[derive(Debug, Clone)]
pub enum Outbound {
    Message(GatewayMessage),
    /// Send a close frame with this code, then stop writing
    Close(CloseCode),
}

/// A single WebSocket connection
pub struct Connection {
    session_id: String,

    /// Display name taken from the identify token
    name: RwLock<Option<String>>,

    state: RwLock<ConnectionState>,

    sender: mpsc::Sender<Outbound>,

    /// Last dispatch sequence number sent
    sequence: AtomicU64,

    last_heartbeat: RwLock<Instant>,

    created_at: Instant,
}

impl Connection {
    pub fn new(session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            name: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    /// Generate a new unique session ID
    #[must_use]
    pub fn generate_session_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Display name, once identified
    pub async fn name(&self) -> Option<String> {
        self.name.read().await.clone()
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        *self.name.write().await = Some(name.into());
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    pub async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.name.read().await.is_some()
    }

    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub async fn record_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
    }

    pub async fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().await.elapsed()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue a frame for this connection
    pub async fn send(&self, message: GatewayMessage) -> Result<(), mpsc::error::SendError<Outbound>> {
        self.sender.send(Outbound::Message(message)).await
    }

    /// Queue a dispatch, stamping it with this connection's next sequence number
    pub async fn dispatch(
        &self,
        event_type: &str,
        data: serde_json::Value,
    ) -> Result<(), mpsc::error::SendError<Outbound>> {
        let seq = self.next_sequence();
        self.send(GatewayMessage::dispatch(event_type, seq, data)).await
    }

    /// Ask the writer to close the socket with `code`
    pub async fn close(&self, code: CloseCode) {
        if self.sender.send(Outbound::Close(code)).await.is_err() {
            tracing::trace!(session_id = %self.session_id, "Writer already gone, close skipped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish()
    }
}
