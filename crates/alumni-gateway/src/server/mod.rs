//! Gateway server setup
//!
//! Provides the WebSocket server routes, state wiring and runner.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::broadcast::{EventDispatcher, EventDispatcherConfig};
use crate::connection::ConnectionManager;
use alumni_cache::{Publisher, RedisPool, RedisPoolConfig};
use alumni_common::{AppConfig, AppError, JwtService};
use alumni_core::SnowflakeGenerator;
use alumni_db::{
    create_pool, PgAccountRepository, PgChatRepository, PgProfileRepository, PgThreadRepository,
};
use alumni_service::ServiceContextBuilder;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Healthy while relayed events are still being forwarded
async fn health_check(State(state): State<GatewayState>) -> (StatusCode, &'static str) {
    if state.event_dispatcher().is_running() {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Relay stopped")
    }
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = alumni_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    if let Err(e) = redis_pool.health_check().await {
        tracing::warn!(error = %e, "Redis is not reachable yet");
    }

    // Messages sent over the gateway are relayed through Redis too, so the
    // receiver may be connected to any gateway instance
    let service_context = ServiceContextBuilder::new()
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
        .thread_repo(Arc::new(PgThreadRepository::new(pool.clone())))
        .chat_repo(Arc::new(PgChatRepository::new(pool)))
        .relay(Arc::new(Publisher::new(redis_pool)))
        .jwt_service(Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.expiry_secs,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let connection_manager = ConnectionManager::new_shared();

    let event_dispatcher = EventDispatcher::new(
        EventDispatcherConfig::from(&config.redis),
        connection_manager.clone(),
    )
    .map_err(|e| AppError::Cache(format!("Failed to create event dispatcher: {e}")))?;

    let event_dispatcher = Arc::new(event_dispatcher);
    event_dispatcher.clone().start();

    Ok(GatewayState::new(
        service_context,
        connection_manager,
        event_dispatcher,
        config,
    ))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let state = create_gateway_state(config).await?;
    let dispatcher = state.event_dispatcher_handle();
    let app = create_app(state);

    let result = run_server(app, addr).await;
    dispatcher.stop();
    result
}
