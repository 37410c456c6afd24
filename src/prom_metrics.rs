//! # Prometheus Metrics — Exposition for the Gateway
//!
//! Exposes gateway and engine metrics in the Prometheus text exposition format.
//!
//! ## Metrics Exposed
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `primegen_generations_total` | Counter | `algorithm` | Completed engine calls |
//! | `primegen_primes_returned_total` | Counter | `algorithm` | Primes returned to callers |
//! | `primegen_generation_seconds` | Histogram | `algorithm` | Engine time per call |
//! | `primegen_rejected_requests_total` | Counter | `reason` | Requests refused before dispatch |
//! | `primegen_runs_logged_total` | Counter | — | Records written to the run log |
//! | `primegen_http_request_duration_seconds` | Histogram | `method`, `path` | HTTP latency |
//!
//! The `/metrics` endpoint renders the current registry state on each scrape.

use crate::engine::Algorithm;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Label set for per-algorithm metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct AlgorithmLabel {
    pub algorithm: String,
}

impl From<Algorithm> for AlgorithmLabel {
    fn from(algorithm: Algorithm) -> Self {
        AlgorithmLabel {
            algorithm: algorithm.as_str().to_string(),
        }
    }
}

/// Why a request never reached the engine.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RejectLabel {
    pub reason: String,
}

/// Label set for HTTP request latency.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

type HistogramFamily<L> = Family<L, Histogram, fn() -> Histogram>;

fn generation_histogram() -> Histogram {
    // 10µs .. ~42s
    Histogram::new(exponential_buckets(0.00001, 4.0, 12))
}

fn http_histogram() -> Histogram {
    // 1ms .. ~33s
    Histogram::new(exponential_buckets(0.001, 2.0, 16))
}

/// Thread-safe metrics registry for the gateway.
///
/// All fields use atomic types and are safe to update from any thread or async task.
pub struct Metrics {
    pub registry: Registry,
    pub generations: Family<AlgorithmLabel, Counter>,
    pub primes_returned: Family<AlgorithmLabel, Counter>,
    pub generation_seconds: HistogramFamily<AlgorithmLabel>,
    pub rejected_requests: Family<RejectLabel, Counter>,
    pub runs_logged: Counter,
    pub http_request_duration: HistogramFamily<HttpLabel>,
}

impl Metrics {
    /// Create a new metrics registry with all primegen metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let generations = Family::<AlgorithmLabel, Counter>::default();
        registry.register(
            "primegen_generations",
            "Completed engine calls by algorithm",
            generations.clone(),
        );

        let primes_returned = Family::<AlgorithmLabel, Counter>::default();
        registry.register(
            "primegen_primes_returned",
            "Primes returned to callers by algorithm",
            primes_returned.clone(),
        );

        let generation_seconds: HistogramFamily<AlgorithmLabel> =
            Family::new_with_constructor(generation_histogram);
        registry.register(
            "primegen_generation_seconds",
            "Engine time per call by algorithm",
            generation_seconds.clone(),
        );

        let rejected_requests = Family::<RejectLabel, Counter>::default();
        registry.register(
            "primegen_rejected_requests",
            "Requests refused before reaching the engine",
            rejected_requests.clone(),
        );

        let runs_logged = Counter::default();
        registry.register(
            "primegen_runs_logged",
            "Records written to the run log",
            runs_logged.clone(),
        );

        let http_request_duration: HistogramFamily<HttpLabel> =
            Family::new_with_constructor(http_histogram);
        registry.register(
            "primegen_http_request_duration_seconds",
            "HTTP request latency by method and path",
            http_request_duration.clone(),
        );

        Self {
            registry,
            generations,
            primes_returned,
            generation_seconds,
            rejected_requests,
            runs_logged,
            http_request_duration,
        }
    }

    /// Record one completed engine call.
    pub fn observe_generation(&self, algorithm: Algorithm, primes: usize, seconds: f64) {
        let label = AlgorithmLabel::from(algorithm);
        self.generations.get_or_create(&label).inc();
        self.primes_returned
            .get_or_create(&label)
            .inc_by(primes as u64);
        self.generation_seconds.get_or_create(&label).observe(seconds);
    }

    pub fn reject(&self, reason: &str) {
        self.rejected_requests
            .get_or_create(&RejectLabel {
                reason: reason.to_string(),
            })
            .inc();
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        encode(&mut buf, &self.registry).expect("encoding metrics should not fail");
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
