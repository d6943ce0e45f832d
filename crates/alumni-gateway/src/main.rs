//! Alumni gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p alumni-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use alumni_common::{try_init_tracing, AppConfig, TracingConfig};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    tracing::info!(
        env = ?config.app.env,
        address = %config.gateway.address(),
        "Starting alumni gateway"
    );

    alumni_gateway::run(config).await.context("Gateway failed")
}
