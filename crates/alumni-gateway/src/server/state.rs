//! Gateway state

use crate::broadcast::EventDispatcher;
use crate::connection::ConnectionManager;
use alumni_common::AppConfig;
use alumni_service::ServiceContext;
use std::sync::Arc;
use std::time::Duration;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    service_context: Arc<ServiceContext>,
    connection_manager: Arc<ConnectionManager>,
    /// Redis Pub/Sub to connection router
    event_dispatcher: Arc<EventDispatcher>,
    config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(
        service_context: ServiceContext,
        connection_manager: Arc<ConnectionManager>,
        event_dispatcher: Arc<EventDispatcher>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            connection_manager,
            event_dispatcher,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    pub fn event_dispatcher(&self) -> &EventDispatcher {
        &self.event_dispatcher
    }

    /// Shared handle for stopping the dispatcher after the server exits
    pub fn event_dispatcher_handle(&self) -> Arc<EventDispatcher> {
        self.event_dispatcher.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Interval announced in HELLO, in milliseconds
    pub fn heartbeat_interval_ms(&self) -> u64 {
        self.config.gateway.heartbeat_interval_ms
    }

    /// Silence after which a connection is considered dead
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.config.gateway.heartbeat_interval_ms.saturating_mul(2))
    }

    pub fn identify_timeout(&self) -> Duration {
        Duration::from_secs(self.config.gateway.identify_timeout_secs)
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("config", &"AppConfig")
            .finish()
    }
}
