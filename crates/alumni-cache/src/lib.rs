//! # alumni-cache
//!
//! Redis connection pool and the pub/sub plumbing behind the chat relay.
//!
//! The REST API publishes a `MESSAGE_CREATE` event to `user:{receiver}`
//! after a message is stored. Every gateway instance runs a [`Subscriber`]
//! and subscribes to the channel of each name it has a live connection for.
//!
//! ```ignore
//! use alumni_cache::{PubSubChannel, PubSubEvent, Publisher, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool);
//! publisher
//!     .publish(&PubSubChannel::user("ada"), &PubSubEvent::new("MESSAGE_CREATE", data))
//!     .await?;
//! ```

pub mod pool;
pub mod pubsub;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, Subscriber, SubscriberBuilder,
    SubscriberConfig, SubscriberError, SubscriberResult, BROADCAST_CHANNEL, USER_CHANNEL_PREFIX,
};
