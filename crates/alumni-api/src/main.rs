//! Alumni API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p alumni-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use alumni_common::{try_init_tracing, AppConfig, TracingConfig};
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting Alumni API Server"
    );

    alumni_api::run(config).await.context("Server failed")?;

    Ok(())
}
