//! Heartbeat handler (op 1)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use std::sync::Arc;

pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Record the heartbeat and answer with op 11.
    ///
    /// `last_sequence` is the client's last received sequence number, if any.
    pub async fn handle(connection: &Arc<Connection>, last_sequence: Option<u64>) -> HandlerResult<()> {
        connection.record_heartbeat().await;

        tracing::trace!(
            session_id = %connection.session_id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        connection
            .send(GatewayMessage::heartbeat_ack())
            .await
            .map_err(|e| HandlerError::Internal(format!("Failed to send heartbeat ACK: {e}")))
    }
}
