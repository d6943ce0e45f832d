//! Application configuration
//!
//! Everything is read from environment variables (optionally seeded from a
//! `.env` file). Required values produce [`ConfigError::MissingVar`]. Values
//! that are present but unparsable produce [`ConfigError::InvalidValue`]
//! instead of silently falling back to a default.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Shortest accepted JWT signing secret
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub gateway: GatewayConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub snowflake: SnowflakeConfig,
    pub sheets: SheetsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// Listen address for the REST server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// WebSocket gateway settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Interval clients are told to heartbeat at
    pub heartbeat_interval_ms: u64,
    /// How long an unidentified connection may stay open
    pub identify_timeout_secs: u64,
}

impl GatewayConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    pub expiry_secs: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Upload storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub max_file_size_mb: u32,
}

impl StorageConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

/// Registration mirror. Disabled when no webhook is configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetsConfig {
    pub webhook_url: Option<String>,
}

// Default value functions
fn default_app_name() -> String {
    "alumni-network".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    5001
}

fn default_gateway_port() -> u16 {
    5002
}

fn default_heartbeat_interval_ms() -> u64 {
    45_000
}

fn default_identify_timeout_secs() -> u64 {
    30
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_jwt_expiry() -> i64 {
    604_800 // 7 days
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} characters"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: optional("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or("APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: optional("API_HOST").unwrap_or_else(default_host),
                port: parse_or("API_PORT", default_api_port())?,
            },
            gateway: GatewayConfig {
                host: optional("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_or("GATEWAY_PORT", default_gateway_port())?,
                heartbeat_interval_ms: parse_or(
                    "GATEWAY_HEARTBEAT_INTERVAL_MS",
                    default_heartbeat_interval_ms(),
                )?,
                identify_timeout_secs: parse_or(
                    "GATEWAY_IDENTIFY_TIMEOUT_SECS",
                    default_identify_timeout_secs(),
                )?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
                min_connections: parse_or("DATABASE_MIN_CONNECTIONS", 2)?,
                run_migrations: parse_or("DATABASE_RUN_MIGRATIONS", true)?,
            },
            redis: RedisConfig {
                url: optional("REDIS_URL").unwrap_or_else(default_redis_url),
                max_connections: parse_or("REDIS_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiry_secs: parse_or("JWT_EXPIRY_SECS", default_jwt_expiry())?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_or("RATE_LIMIT_PER_SECOND", 10)?,
                burst: parse_or("RATE_LIMIT_BURST", 50)?,
            },
            cors: CorsConfig {
                allowed_origins: optional("CORS_ALLOWED_ORIGINS")
                    .map(|s| split_list(&s))
                    .unwrap_or_else(default_cors_origins),
            },
            storage: StorageConfig {
                upload_dir: optional("UPLOAD_DIR").unwrap_or_else(default_upload_dir),
                max_file_size_mb: parse_or("MAX_FILE_SIZE_MB", 5)?,
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_or("WORKER_ID", 0)?,
            },
            sheets: SheetsConfig {
                webhook_url: optional("SHEETS_WEBHOOK_URL"),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Read a variable, treating empty values as unset
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::MissingVar(key))
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
