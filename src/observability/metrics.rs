//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded operations by method, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency
//! - `gateway_upstream_attempts_total` (counter): calls by candidate, status
//! - `gateway_upstream_duration_seconds` (histogram): per-call latency
//! - `gateway_upstream_retries_total` (counter): rate-limit retries by candidate
//! - `gateway_fallbacks_total` (counter): chain advances by candidate, status

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("gateway_requests_total", &labels).increment(1);
    metrics::histogram!("gateway_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_attempt(candidate: &str, status: u16, start: Instant) {
    let labels = [
        ("candidate", candidate.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("gateway_upstream_attempts_total", &labels).increment(1);
    metrics::histogram!("gateway_upstream_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_retry(candidate: &str) {
    metrics::counter!("gateway_upstream_retries_total", "candidate" => candidate.to_string())
        .increment(1);
}

pub fn record_fallback(candidate: &str, status: u16) {
    metrics::counter!(
        "gateway_fallbacks_total",
        "candidate" => candidate.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
