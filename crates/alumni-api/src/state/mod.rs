//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context, the infrastructure handles used by readiness
//! checks, and configuration.

use std::path::Path;
use std::sync::Arc;

use alumni_cache::RedisPool;
use alumni_common::{AppConfig, JwtService};
use alumni_db::PgPool;
use alumni_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    db_pool: PgPool,
    redis_pool: RedisPool,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        db_pool: PgPool,
        redis_pool: RedisPool,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            db_pool,
            redis_pool,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn redis_pool(&self) -> &RedisPool {
        &self.redis_pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    /// Directory uploaded files are written to and served from
    pub fn upload_dir(&self) -> &Path {
        Path::new(&self.config.storage.upload_dir)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("redis_pool", &self.redis_pool)
            .field("config", &"AppConfig")
            .finish()
    }
}
