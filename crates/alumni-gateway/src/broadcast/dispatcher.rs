//! Event dispatcher
//!
//! Receives events from Redis Pub/Sub and forwards each one to the live
//! connections of the name its channel is addressed to.

use crate::connection::ConnectionManager;
use alumni_cache::{PubSubChannel, ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberError};
use alumni_common::RedisConfig;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, Notify};

/// Configuration for the event dispatcher
#[derive(Debug, Clone)]
pub struct EventDispatcherConfig {
    pub redis_url: String,
    pub broadcast_buffer: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for EventDispatcherConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

impl From<&RedisConfig> for EventDispatcherConfig {
    fn from(config: &RedisConfig) -> Self {
        Self {
            redis_url: config.url.clone(),
            ..Self::default()
        }
    }
}

/// Routes Redis Pub/Sub messages to WebSocket connections
pub struct EventDispatcher {
    connection_manager: Arc<ConnectionManager>,
    subscriber: Subscriber,
    /// Names whose relay channel is subscribed. Held across the connection
    /// change and the subscriber command so both stay in the same order.
    relay_names: Mutex<HashSet<String>>,
    running: Arc<AtomicBool>,
    stopped: Notify,
}

impl EventDispatcher {
    pub fn new(
        config: EventDispatcherConfig,
        connection_manager: Arc<ConnectionManager>,
    ) -> Result<Self, SubscriberError> {
        let subscriber = SubscriberBuilder::new()
            .redis_url(&config.redis_url)
            .broadcast_buffer(config.broadcast_buffer)
            .reconnect_delay_ms(config.reconnect_delay_ms)
            .build()?;

        Ok(Self {
            connection_manager,
            subscriber,
            relay_names: Mutex::new(HashSet::new()),
            running: Arc::new(AtomicBool::new(false)),
            stopped: Notify::new(),
        })
    }

    /// Register an identified session under `name` and make sure the name's
    /// relay channel is subscribed.
    ///
    /// Returns `false` when the session is no longer known.
    pub async fn attach(&self, session_id: &str, name: &str) -> Result<bool, SubscriberError> {
        let mut relay_names = self.relay_names.lock().await;

        if !self.connection_manager.authenticate_connection(session_id, name).await {
            return Ok(false);
        }

        if relay_names.insert(name.to_string()) {
            if let Err(e) = self.subscriber.subscribe(&[PubSubChannel::user(name)]) {
                relay_names.remove(name);
                return Err(e);
            }
        }

        Ok(true)
    }

    /// Drop a session. Unsubscribes its name once no session for it is left.
    ///
    /// Returns the released name, if any.
    pub async fn detach(&self, session_id: &str) -> Result<Option<String>, SubscriberError> {
        let mut relay_names = self.relay_names.lock().await;

        let Some(name) = self.connection_manager.remove_connection(session_id).await else {
            return Ok(None);
        };

        if relay_names.remove(&name) {
            self.subscriber.unsubscribe(&[PubSubChannel::user(&name)])?;
        }

        Ok(Some(name))
    }

    /// Spawn the background task that forwards received events
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run().await;
        });

        tracing::info!("Event dispatcher started");
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stopped.notify_waiters();
        if let Err(e) = self.subscriber.shutdown() {
            tracing::debug!(error = %e, "Subscriber already stopped");
        }
        tracing::info!("Event dispatcher stopped");
    }

    async fn run(&self) {
        let mut receiver = self.subscriber.receiver();

        while self.running.load(Ordering::SeqCst) {
            let received = tokio::select! {
                () = self.stopped.notified() => break,
                received = receiver.recv() => received,
            };

            match received {
                Ok(msg) => {
                    self.handle_message(msg).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Event dispatcher lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Event dispatcher channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher loop ended");
    }

    /// Forward one received message. Returns how many connections got it.
    async fn handle_message(&self, msg: ReceivedMessage) -> usize {
        let Some(recipient) = msg.recipient() else {
            tracing::debug!(channel = ?msg.channel, "Message on a non-user channel, ignoring");
            return 0;
        };

        let Some(event) = &msg.event else {
            tracing::debug!(channel = ?msg.channel, "Received non-event message, ignoring");
            return 0;
        };

        let sent = self
            .connection_manager
            .send_to_name(recipient, &event.event_type, &event.data)
            .await;

        tracing::trace!(
            recipient = %recipient,
            event_type = %event.event_type,
            sent = sent,
            "Event dispatched"
        );

        sent
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
