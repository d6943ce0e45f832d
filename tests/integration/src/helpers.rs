//! Test helpers for integration tests
//!
//! Spawns the API and gateway on ephemeral ports and wraps the HTTP and
//! WebSocket clients the tests drive them with.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use alumni_api::{create_app, create_app_state};
use alumni_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, GatewayConfig, JwtConfig,
    RateLimitConfig, RedisConfig, ServerConfig, SheetsConfig, SnowflakeConfig, StorageConfig,
};
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Shared by every server a test starts, so tokens work across API and gateway
const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Every server in the process gets its own snowflake worker so ids never collide
static NEXT_WORKER_ID: AtomicU16 = AtomicU16::new(2);

/// How long to wait for a gateway frame
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            alumni_api::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// POST a multipart form with auth token
    pub async fn post_form(&self, path: &str, token: &str, form: multipart::Form) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

/// Gateway instance on an ephemeral port
pub struct TestGateway {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    pub async fn start() -> Result<Self> {
        let state = alumni_gateway::create_gateway_state(test_config()?).await?;
        let app = alumni_gateway::create_app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Open a connection and consume the HELLO frame
    pub async fn connect(&self) -> Result<GatewayClient> {
        let (ws, _) = connect_async(format!("ws://{}/gateway", self.addr)).await?;
        let mut client = GatewayClient { ws };

        let hello = client.next_frame().await?;
        anyhow::ensure!(hello["op"] == 10, "expected HELLO, got {hello}");

        Ok(client)
    }

    /// Connect and identify, returning the client after READY
    pub async fn identify(&self, token: &str) -> Result<GatewayClient> {
        let mut client = self.connect().await?;
        client
            .send(&serde_json::json!({"op": 2, "d": {"token": format!("Bearer {token}")}}))
            .await?;

        let ready = client.next_frame().await?;
        anyhow::ensure!(ready["t"] == "READY", "expected READY, got {ready}");

        Ok(client)
    }
}

/// WebSocket client speaking the gateway's JSON frames
pub struct GatewayClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    pub async fn send(&mut self, frame: &Value) -> Result<()> {
        self.ws.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Next text frame as JSON, skipping pings
    pub async fn next_frame(&mut self) -> Result<Value> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for a gateway frame")?
                .context("gateway closed the stream")??;

            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Ping(_) | Message::Pong(_) => {}
                other => anyhow::bail!("unexpected frame: {other:?}"),
            }
        }
    }

    /// Next dispatch of the given event type, skipping other frames
    pub async fn next_dispatch(&mut self, event_type: &str) -> Result<Value> {
        loop {
            let frame = self.next_frame().await?;
            if frame["op"] == 0 && frame["t"] == event_type {
                return Ok(frame["d"].clone());
            }
        }
    }
}

/// Configuration built from `DATABASE_URL` and `REDIS_URL`
pub fn test_config() -> Result<AppConfig> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    let redis_url = std::env::var("REDIS_URL").context("REDIS_URL not set")?;

    Ok(AppConfig {
        app: AppSettings {
            name: "alumni-network-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        gateway: GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            heartbeat_interval_ms: 45_000,
            identify_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
            run_migrations: true,
        },
        redis: RedisConfig {
            url: redis_url,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_secs: 3600,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        storage: StorageConfig {
            upload_dir: std::env::temp_dir()
                .join("alumni-integration-uploads")
                .display()
                .to_string(),
            max_file_size_mb: 1,
        },
        snowflake: SnowflakeConfig {
            worker_id: NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed),
        },
        sheets: SheetsConfig::default(),
    })
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
