//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use alumni_cache::{Publisher, RedisPool, RedisPoolConfig};
use alumni_common::{AppConfig, AppError, JwtService};
use alumni_core::SnowflakeGenerator;
use alumni_db::{
    create_pool, run_migrations, PgAccountRepository, PgChatRepository, PgProfileRepository,
    PgThreadRepository,
};
use alumni_service::{RegistrationMirror, ServiceContextBuilder, WebhookMirror};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;
use crate::storage::UPLOADS_ROUTE;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        &config.storage,
        config.app.env.is_production(),
    )?;

    let router = api
        .merge(health_routes())
        .nest_service(UPLOADS_ROUTE, ServeDir::new(state.upload_dir()));

    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = alumni_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    if let Err(e) = redis_pool.health_check().await {
        // Chat still persists without Redis; only live delivery is lost
        warn!(error = %e, "Redis is not reachable yet");
    }

    tokio::fs::create_dir_all(&config.storage.upload_dir)
        .await
        .map_err(|e| AppError::Storage(format!("{}: {e}", config.storage.upload_dir)))?;

    let mirror = match &config.sheets.webhook_url {
        Some(url) => {
            info!("Registration mirror enabled");
            let mirror = WebhookMirror::new(url.clone()).map_err(|e| AppError::Config(e.to_string()))?;
            Some(Arc::new(mirror) as Arc<dyn RegistrationMirror>)
        }
        None => None,
    };

    let service_context = ServiceContextBuilder::new()
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
        .thread_repo(Arc::new(PgThreadRepository::new(pool.clone())))
        .chat_repo(Arc::new(PgChatRepository::new(pool.clone())))
        .relay(Arc::new(Publisher::new(redis_pool.clone())))
        .mirror(mirror)
        .jwt_service(Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.expiry_secs,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, pool, redis_pool, config))
}

/// Serve `app` on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}
