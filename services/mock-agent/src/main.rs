//! # Mock Agent
//!
//! Standalone cloud agent double for running the suites by hand.

use harness_core::BUILD_INFO;
use mock_agent::MockAgentConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting mock agent {}", BUILD_INFO);

    let config = MockAgentConfig::from_env()?;
    mock_agent::serve(&config).await
}
