//! Chat message entity - one direct message between two alumni

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Immutable direct message. Ids increase with creation time, so a
/// conversation is read in id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Snowflake,
    pub sender: String,
    pub receiver: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new ChatMessage
    pub fn new(id: Snowflake, sender: String, receiver: String, message: String) -> Self {
        Self {
            id,
            sender,
            receiver,
            message,
            created_at: Utc::now(),
        }
    }

    /// Check whether `name` is either side of this message
    #[inline]
    pub fn involves(&self, name: &str) -> bool {
        self.sender == name || self.receiver == name
    }

    /// The other participant, seen from `name`
    pub fn counterpart(&self, name: &str) -> Option<&str> {
        if self.sender == name {
            Some(&self.receiver)
        } else if self.receiver == name {
            Some(&self.sender)
        } else {
            None
        }
    }

    /// Check if this message belongs to the conversation between `a` and `b`
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender == a && self.receiver == b) || (self.sender == b && self.receiver == a)
    }
}
