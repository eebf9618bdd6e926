//! Metrics collection for relay-service.
//!
//! Prometheus counters for inbound relay requests and outbound provider
//! calls, exposed at the /metrics endpoint.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static RELAY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PROVIDER_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection. Safe to call more than once; only the
/// first call installs the registry (tests spawn several apps per process).
pub fn init_metrics() {
    let registry = Registry::new();

    let relay_requests = IntCounterVec::new(
        Opts::new(
            "relay_requests_total",
            "Total relay requests by endpoint and outcome",
        ),
        &["endpoint", "outcome"],
    )
    .expect("Failed to create relay_requests_total metric");

    let provider_calls = IntCounterVec::new(
        Opts::new(
            "relay_provider_calls_total",
            "Total outbound provider calls by provider and status",
        ),
        &["provider", "status"],
    )
    .expect("Failed to create relay_provider_calls_total metric");

    if PROMETHEUS_REGISTRY.set(registry).is_err() {
        return;
    }

    let registry = PROMETHEUS_REGISTRY
        .get()
        .expect("registry set on the line above");
    registry
        .register(Box::new(relay_requests.clone()))
        .expect("Failed to register relay_requests_total");
    registry
        .register(Box::new(provider_calls.clone()))
        .expect("Failed to register relay_provider_calls_total");

    let _ = RELAY_REQUESTS_TOTAL.set(relay_requests);
    let _ = PROVIDER_CALLS_TOTAL.set(provider_calls);
}

/// Count an inbound relay request by endpoint and outcome.
pub fn record_relay_request(endpoint: &str, outcome: &str) {
    if let Some(counter) = RELAY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[endpoint, outcome]).inc();
    }
}

/// Count an outbound provider call by provider and status.
pub fn record_provider_call(provider: &str, status: &str) {
    if let Some(counter) = PROVIDER_CALLS_TOTAL.get() {
        counter.with_label_values(&[provider, status]).inc();
    }
}

/// Render the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let Some(registry) = PROMETHEUS_REGISTRY.get() else {
        return "# Metrics not initialized\n".to_string();
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&registry.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
