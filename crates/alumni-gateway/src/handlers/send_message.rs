//! Send message handler (op 3)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::SendMessagePayload;
use crate::server::GatewayState;
use alumni_service::dto::SendMessageRequest;
use alumni_service::ChatService;
use std::sync::Arc;

pub struct SendMessageHandler;

impl SendMessageHandler {
    /// Store and relay a chat message from the identified connection.
    ///
    /// Goes through the same service call as `POST /chat/send`, so the
    /// receiver gets it over the relay like any other message.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: SendMessagePayload,
    ) -> HandlerResult<()> {
        let sender = connection.name().await.ok_or(HandlerError::NotAuthenticated)?;

        let request = SendMessageRequest {
            receiver: payload.receiver,
            message: payload.message,
        };
        let sent = ChatService::new(state.service_context())
            .send_message(&sender, request)
            .await?;

        tracing::debug!(
            session_id = %connection.session_id(),
            message_id = %sent.id,
            "Message sent over gateway"
        );

        Ok(())
    }
}
