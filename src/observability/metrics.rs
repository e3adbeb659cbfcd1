//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gemini_proxy_requests_total` (counter): invocations by method, status
//! - `gemini_proxy_request_duration_seconds` (histogram): invocation latency
//! - `gemini_proxy_upstream_requests_total` (counter): outbound calls by outcome
//! - `gemini_proxy_upstream_duration_seconds` (histogram): outbound latency
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed invocation.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gemini_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gemini_proxy_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a completed outbound call. `outcome` is a status code or "transport_error".
pub fn record_upstream(outcome: &str, start: Instant) {
    metrics::counter!(
        "gemini_proxy_upstream_requests_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("gemini_proxy_upstream_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
