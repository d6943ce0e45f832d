//! # alumni-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, validate_password_strength, verify_password, Claims, IssuedToken, JwtService,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, GatewayConfig,
    JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, SheetsConfig, SnowflakeConfig,
    StorageConfig,
};
pub use error::AppError;
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
