//! # Trustdrops Account Service
//!
//! Entry point for the account service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs, optional OTLP traces, metrics)
//! 2. Load configuration from the environment
//! 3. Reject missing Twitter credentials in production
//! 4. Construct the service container
//! 5. Start the approval handler
//! 6. Wait for Ctrl-C, then shut down gracefully

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use account_runtime::adapters::LoggingTransactionQueue;
use account_runtime::{AccountRuntime, AppConfig, ServiceContainer};
use trustdrops_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .await
        .context("Failed to initialize telemetry")?;

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    if config.is_production() {
        config
            .validate_for_production()
            .context("Configuration is not production ready")?;
    }

    info!("===========================================");
    info!("  Trustdrops Account Service v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(base_api_url = %config.base_api_url, "Configuration loaded");

    let container = ServiceContainer::new(config).context("Failed to build service container")?;
    if let Some(twitter) = &container.twitter {
        info!(
            client_id = twitter.client_id(),
            callback_url = twitter.callback_url(),
            scopes = %twitter.scope_param(),
            "Twitter OAuth configured"
        );
    }
    let runtime = AccountRuntime::new(container, Arc::new(LoggingTransactionQueue));
    runtime.start();

    info!("Account service is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    if let Some(stats) = runtime.shutdown().await {
        info!(
            forwarded = stats.forwarded,
            rejected = stats.rejected,
            lagged = stats.lagged,
            "Approval handler summary"
        );
    }

    Ok(())
}
