//! Op code handlers
//!
//! Handles incoming WebSocket messages based on their operation code.

mod error;
mod heartbeat;
mod identify;
mod send_message;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use identify::IdentifyHandler;
pub use send_message::SendMessageHandler;

use crate::connection::Connection;
use crate::protocol::{GatewayMessage, OpCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<()> {
        match message.op {
            OpCode::Identify => {
                let payload = message.as_identify().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Identify payload".to_string())
                })?;

                IdentifyHandler::handle(state, connection, payload).await
            }
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Heartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(connection, seq).await
            }
            OpCode::SendMessage => {
                if !connection.is_authenticated().await {
                    return Err(HandlerError::NotAuthenticated);
                }

                let payload = message.as_send_message().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid SendMessage payload".to_string())
                })?;

                SendMessageHandler::handle(state, connection, payload).await
            }
            OpCode::Dispatch | OpCode::Hello | OpCode::HeartbeatAck => {
                tracing::warn!(
                    session_id = %connection.session_id(),
                    op = %message.op,
                    "Received server-only op code from client"
                );
                Err(HandlerError::UnknownOpcode(message.op))
            }
        }
    }
}
