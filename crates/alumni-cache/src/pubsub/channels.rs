//! Pub/Sub channel naming.

/// Channel prefix for events addressed to one display name
pub const USER_CHANNEL_PREFIX: &str = "user:";
/// Channel for events every connected client receives
pub const BROADCAST_CHANNEL: &str = "broadcast";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for every live connection of one display name
    User(String),
    /// Broadcast to all connected clients
    Broadcast,
    /// Anything else
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    #[must_use]
    pub fn broadcast() -> Self {
        Self::Broadcast
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::User(name) => format!("{USER_CHANNEL_PREFIX}{name}"),
            Self::Broadcast => BROADCAST_CHANNEL.to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a Redis channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == BROADCAST_CHANNEL {
            return Self::Broadcast;
        }

        match name.strip_prefix(USER_CHANNEL_PREFIX) {
            Some(user) if !user.is_empty() => Self::User(user.to_string()),
            _ => Self::Custom(name.to_string()),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
