//! Chat service
//!
//! Direct messages between alumni, addressed by display name. A sent
//! message is stored first and then relayed to the receiver's live
//! connections; relay failures never undo the write.

use alumni_core::entities::ChatMessage;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{ChatMessageResponse, SendMessageRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::relay::MESSAGE_CREATE;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Everyone `name` has exchanged messages with, sorted by name
    #[instrument(skip(self))]
    pub async fn partners(&self, name: &str) -> ServiceResult<Vec<String>> {
        Ok(self.ctx.chat_repo().find_partners(name).await?)
    }

    /// Messages between `a` and `b` in either direction, oldest first
    #[instrument(skip(self))]
    pub async fn conversation(&self, a: &str, b: &str) -> ServiceResult<Vec<ChatMessageResponse>> {
        let messages = self.ctx.chat_repo().find_conversation(a, b).await?;
        Ok(messages.into_iter().map(ChatMessageResponse::from).collect())
    }

    #[instrument(skip(self, request), fields(receiver = %request.receiver))]
    pub async fn send_message(
        &self,
        sender: &str,
        request: SendMessageRequest,
    ) -> ServiceResult<ChatMessageResponse> {
        request.validate()?;

        let receiver = request.receiver.trim();
        if receiver.is_empty() || request.message.trim().is_empty() {
            return Err(ServiceError::validation("Receiver and message are required"));
        }

        let message = ChatMessage::new(
            self.ctx.generate_id(),
            sender.to_string(),
            receiver.to_string(),
            request.message,
        );
        self.ctx.chat_repo().create(&message).await?;

        info!(message_id = %message.id, "Chat message stored");

        let response = ChatMessageResponse::from(message);
        self.relay(&response).await;

        Ok(response)
    }

    async fn relay(&self, message: &ChatMessageResponse) {
        let Some(relay) = self.ctx.relay() else {
            debug!("No relay configured, skipping live delivery");
            return;
        };

        let data = match serde_json::to_value(message) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Failed to encode chat message for relay");
                return;
            }
        };

        if let Err(e) = relay.relay(&message.receiver, MESSAGE_CREATE, data).await {
            warn!(
                message_id = %message.id,
                receiver = %message.receiver,
                error = %e,
                "Failed to relay chat message"
            );
        }
    }
}
