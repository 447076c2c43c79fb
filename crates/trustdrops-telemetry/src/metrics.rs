//! Prometheus metrics for the account service.
//!
//! All metrics follow the naming convention: `td_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SIGNATURE METRICS
    // =========================================================================

    /// Signer recoveries by result (recovered/failed)
    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("td_signature_verifications_total", "Signer recoveries by result"),
        &["result"]
    ).expect("metric creation failed");

    /// Signer recovery duration
    pub static ref SIGNATURE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "td_signature_recovery_duration_seconds",
            "Time spent recovering a signer address"
        ).buckets(exponential_buckets(0.00001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // ACCOUNT METRICS
    // =========================================================================

    /// Users created
    pub static ref USERS_CREATED: Counter = Counter::new(
        "td_accounts_users_created_total",
        "Total number of user records created"
    ).expect("metric creation failed");

    /// Users updated
    pub static ref USERS_UPDATED: Counter = Counter::new(
        "td_accounts_users_updated_total",
        "Total number of user records updated"
    ).expect("metric creation failed");

    /// Account errors surfaced to callers, by kind
    pub static ref ACCOUNT_ERRORS: CounterVec = CounterVec::new(
        Opts::new("td_accounts_errors_total", "Account errors by kind"),
        &["kind"]
    ).expect("metric creation failed");

    // =========================================================================
    // APPROVAL METRICS
    // =========================================================================

    /// Approval requests handed to the transaction queue
    pub static ref APPROVALS_QUEUED: Counter = Counter::new(
        "td_approvals_queued_total",
        "Approval requests handed to the transaction queue"
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS METRICS
    // =========================================================================

    /// Events published with no subscriber or skipped by a lagging one
    pub static ref EVENTS_DROPPED: CounterVec = CounterVec::new(
        Opts::new("td_event_bus_events_dropped_total", "Events lost by the event bus"),
        &["reason"]  // reason: no_subscriber/lagged
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
        Box::new(SIGNATURE_DURATION.clone()),
        Box::new(USERS_CREATED.clone()),
        Box::new(USERS_UPDATED.clone()),
        Box::new(ACCOUNT_ERRORS.clone()),
        Box::new(APPROVALS_QUEUED.clone()),
        Box::new(EVENTS_DROPPED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
