//! Real-time relay hook for chat messages

use alumni_cache::Publisher;
use async_trait::async_trait;

/// Dispatch event carrying a newly stored chat message
pub const MESSAGE_CREATE: &str = "MESSAGE_CREATE";

/// Delivers an event to the live connections of one display name
#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn relay(
        &self,
        recipient: &str,
        event_type: &str,
        data: serde_json::Value,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl MessageRelay for Publisher {
    async fn relay(
        &self,
        recipient: &str,
        event_type: &str,
        data: serde_json::Value,
    ) -> anyhow::Result<()> {
        self.publish_to_user(recipient, event_type, data).await?;
        Ok(())
    }
}
