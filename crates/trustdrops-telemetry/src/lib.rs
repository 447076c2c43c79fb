//! # Trustdrops Telemetry
//!
//! Observability for the account service.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered as pretty or JSON console output
//! - **Traces**: optional OpenTelemetry OTLP export
//! - **Metrics**: Prometheus counters and histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trustdrops_telemetry::{TelemetryConfig, init_telemetry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).await.expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | unset | OTLP collector endpoint; no export when unset |
//! | `OTEL_SERVICE_NAME` | `trustdrops-accounts` | Service name in traces |
//! | `TD_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `TD_JSON_LOGS` | `false` (`true` in containers) | JSON log output |
//! | `TD_CONSOLE_OUTPUT` | `true` | Console output |
//! | `TD_ENVIRONMENT` | `development` | Deployment environment |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, ACCOUNT_ERRORS, APPROVALS_QUEUED,
    EVENTS_DROPPED, SIGNATURE_DURATION, SIGNATURE_VERIFICATIONS, USERS_CREATED, USERS_UPDATED,
};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize OpenTelemetry tracer: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize metrics and the global tracing subscriber.
///
/// Returns a guard that must be held for the lifetime of the application.
/// When dropped, it flushes pending spans.
pub async fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    let tracing_guard = tracing_setup::init_tracing(&config).await?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
    })
}

/// Guard that keeps telemetry active. Drop to flush and shutdown.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
