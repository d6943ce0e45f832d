//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, GatewayConfig,
    JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, SheetsConfig, SnowflakeConfig,
    StorageConfig, MIN_JWT_SECRET_LEN,
};
