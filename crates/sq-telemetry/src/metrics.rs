//! Prometheus metrics for the state-query services.
//!
//! All metrics follow the naming convention: `sq_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., queries_sent_total)
//! - **Gauge**: Value that can go up or down (e.g., pending_queries)
//! - **Histogram**: Distribution of values (e.g., verify_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // GATEWAY METRICS
    // =========================================================================

    /// Queries accepted by `send_query`
    pub static ref QUERIES_SENT: Counter = Counter::new(
        "sq_gateway_queries_sent_total",
        "Total number of query bundles accepted by the gateway"
    ).expect("metric creation failed");

    /// Queries fulfilled by `receive_query`
    pub static ref QUERIES_FULFILLED: Counter = Counter::new(
        "sq_gateway_queries_fulfilled_total",
        "Total number of queries fulfilled with a verified proof"
    ).expect("metric creation failed");

    /// Proofs refused by a light client
    pub static ref PROOFS_REJECTED: Counter = Counter::new(
        "sq_gateway_proofs_rejected_total",
        "Total number of proofs rejected by the bound light client"
    ).expect("metric creation failed");

    /// Consumer callbacks that failed after commit
    pub static ref CALLBACK_FAILURES: Counter = Counter::new(
        "sq_gateway_callback_failures_total",
        "Total number of consumer callbacks that failed after fulfilment"
    ).expect("metric creation failed");

    /// Queries waiting for a proof
    pub static ref PENDING_QUERIES: Gauge = Gauge::new(
        "sq_gateway_pending_queries",
        "Number of queries in Pending status"
    ).expect("metric creation failed");

    /// Light-client verification duration
    pub static ref VERIFY_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "sq_gateway_verify_duration_seconds",
            "Time spent verifying proofs against the light client"
        ).buckets(exponential_buckets(0.0001, 2.0, 12).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // CONSUMER METRICS
    // =========================================================================

    /// Results handled by consumers
    pub static ref CONSUMER_RESULTS: CounterVec = CounterVec::new(
        Opts::new("sq_consumer_results_total", "Query results handled by consumers"),
        &["consumer", "outcome"]  // consumer: balance/custom/voting, outcome: applied/rejected
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Gateway
        Box::new(QUERIES_SENT.clone()),
        Box::new(QUERIES_FULFILLED.clone()),
        Box::new(PROOFS_REJECTED.clone()),
        Box::new(CALLBACK_FAILURES.clone()),
        Box::new(PENDING_QUERIES.clone()),
        Box::new(VERIFY_DURATION.clone()),
        // Consumers
        Box::new(CONSUMER_RESULTS.clone()),
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
