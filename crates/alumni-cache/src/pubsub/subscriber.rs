//! Redis Pub/Sub subscriber.
//!
//! One background task owns the Redis pub/sub connection. Subscription
//! changes go to it over an unbounded command channel, so callers never wait
//! on Redis, and every received message is fanned out on a broadcast channel.
//! The task reconnects on failure and re-subscribes to everything it held
//! before, including changes queued while it was offline.

use crate::pubsub::{PubSubChannel, PubSubEvent};
use futures_util::StreamExt;
use redis::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Subscriber task has stopped")]
    ChannelClosed,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Message received from Pub/Sub
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub channel: PubSubChannel,
    /// Parsed event, `None` when the payload is not a [`PubSubEvent`]
    pub event: Option<PubSubEvent>,
    pub payload: String,
}

impl ReceivedMessage {
    fn from_redis(channel_name: &str, payload: String) -> Self {
        Self {
            channel: PubSubChannel::parse(channel_name),
            event: serde_json::from_str(&payload).ok(),
            payload,
        }
    }

    /// Display name this message is addressed to, if it came in on a user channel
    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        match &self.channel {
            PubSubChannel::User(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    /// Capacity of the fan-out broadcast channel
    pub broadcast_buffer: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

#[derive(Debug)]
enum SubscriberCommand {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    Shutdown,
}

/// Redis Pub/Sub subscriber
pub struct Subscriber {
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    control_tx: mpsc::UnboundedSender<SubscriberCommand>,
}

impl Subscriber {
    /// Create a subscriber and spawn its listener task.
    ///
    /// Connection errors surface in the logs, not here; the task keeps
    /// retrying until [`Subscriber::shutdown`] is called.
    #[must_use]
    pub fn new(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let subscribed = Arc::new(RwLock::new(HashSet::new()));

        tokio::spawn(Self::listener_loop(
            config,
            subscribed,
            broadcast_tx.clone(),
            control_rx,
        ));

        Self {
            broadcast_tx,
            control_tx,
        }
    }

    async fn listener_loop(
        config: SubscriberConfig,
        subscribed: Arc<RwLock<HashSet<String>>>,
        broadcast_tx: broadcast::Sender<ReceivedMessage>,
        mut control_rx: mpsc::UnboundedReceiver<SubscriberCommand>,
    ) {
        loop {
            let shutdown = match Self::run_listener(&config, &subscribed, &broadcast_tx, &mut control_rx).await {
                Ok(true) => true,
                Ok(false) => Self::wait_offline(&config, &subscribed, &mut control_rx).await,
                Err(e) => {
                    tracing::error!(error = %e, "Subscriber error, reconnecting");
                    Self::wait_offline(&config, &subscribed, &mut control_rx).await
                }
            };
            if shutdown {
                tracing::info!("Subscriber shutting down");
                break;
            }
        }
    }

    /// Sit out the reconnect delay while still taking commands.
    ///
    /// Subscription changes only touch the channel set, which the next
    /// connection subscribes in full. Returns `true` on shutdown.
    async fn wait_offline(
        config: &SubscriberConfig,
        subscribed: &Arc<RwLock<HashSet<String>>>,
        control_rx: &mut mpsc::UnboundedReceiver<SubscriberCommand>,
    ) -> bool {
        let delay = tokio::time::sleep(Duration::from_millis(config.reconnect_delay_ms));
        tokio::pin!(delay);

        loop {
            tokio::select! {
                () = &mut delay => return false,
                cmd = control_rx.recv() => match cmd {
                    Some(SubscriberCommand::Subscribe(channels)) => {
                        subscribed.write().await.extend(channels);
                    }
                    Some(SubscriberCommand::Unsubscribe(channels)) => {
                        let mut set = subscribed.write().await;
                        for channel in &channels {
                            set.remove(channel);
                        }
                    }
                    Some(SubscriberCommand::Shutdown) | None => return true,
                },
            }
        }
    }

    /// Run until the connection drops (`Ok(false)`) or shutdown (`Ok(true)`)
    async fn run_listener(
        config: &SubscriberConfig,
        subscribed: &Arc<RwLock<HashSet<String>>>,
        broadcast_tx: &broadcast::Sender<ReceivedMessage>,
        control_rx: &mut mpsc::UnboundedReceiver<SubscriberCommand>,
    ) -> SubscriberResult<bool> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        {
            let channels = subscribed.read().await;
            for channel in channels.iter() {
                pubsub.subscribe(channel).await?;
            }
            tracing::info!(channels = channels.len(), "Subscriber connected to Redis");
        }

        let mut stream = pubsub.on_message();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        tracing::warn!("Pub/Sub stream ended");
                        return Ok(false);
                    };
                    let channel_name = msg.get_channel_name().to_string();
                    let payload: String = msg.get_payload().unwrap_or_default();

                    tracing::trace!(channel = %channel_name, "Received Pub/Sub message");

                    // No receivers just means no live connections right now
                    let _ = broadcast_tx.send(ReceivedMessage::from_redis(&channel_name, payload));
                }

                cmd = control_rx.recv() => {
                    match cmd {
                        Some(SubscriberCommand::Subscribe(channels)) => {
                            drop(stream);
                            subscribed.write().await.extend(channels.iter().cloned());
                            for channel in &channels {
                                // The set is already updated; a reconnect applies it in full
                                pubsub.subscribe(channel).await.inspect_err(|e| {
                                    tracing::error!(channel = %channel, error = %e, "Failed to subscribe");
                                })?;
                                tracing::debug!(channel = %channel, "Subscribed to channel");
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Unsubscribe(channels)) => {
                            drop(stream);
                            {
                                let mut set = subscribed.write().await;
                                for channel in &channels {
                                    set.remove(channel);
                                }
                            }
                            for channel in &channels {
                                pubsub.unsubscribe(channel).await.inspect_err(|e| {
                                    tracing::error!(channel = %channel, error = %e, "Failed to unsubscribe");
                                })?;
                                tracing::debug!(channel = %channel, "Unsubscribed from channel");
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Shutdown) | None => return Ok(true),
                    }
                }
            }
        }
    }

    /// Queue a subscription. Commands apply in the order they are sent.
    pub fn subscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        let names = channels.iter().map(PubSubChannel::name).collect();
        self.send(SubscriberCommand::Subscribe(names))
    }

    pub fn unsubscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        let names = channels.iter().map(PubSubChannel::name).collect();
        self.send(SubscriberCommand::Unsubscribe(names))
    }

    fn send(&self, command: SubscriberCommand) -> SubscriberResult<()> {
        self.control_tx
            .send(command)
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    /// A new receiver for every message on every subscribed channel
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.broadcast_tx.subscribe()
    }

    pub fn shutdown(&self) -> SubscriberResult<()> {
        self.send(SubscriberCommand::Shutdown)
    }
}

/// Builder for [`Subscriber`]
#[derive(Debug, Default)]
pub struct SubscriberBuilder {
    config: SubscriberConfig,
    initial_channels: Vec<PubSubChannel>,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn subscribe(mut self, channel: PubSubChannel) -> Self {
        self.initial_channels.push(channel);
        self
    }

    /// Start the subscriber and queue the initial subscriptions
    pub fn build(self) -> SubscriberResult<Subscriber> {
        let subscriber = Subscriber::new(self.config);

        if !self.initial_channels.is_empty() {
            subscriber.subscribe(&self.initial_channels)?;
        }

        Ok(subscriber)
    }
}
