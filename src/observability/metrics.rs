//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by backend, route, status
//! - `proxy_request_duration_seconds` (histogram): latency by backend
//! - `proxy_upstream_errors_total` (counter): forwarding failures by backend
//! - `proxy_async_search_ids_recorded_total` (counter): captured CCS ids
//! - `proxy_async_search_capture_failures_total` (counter): by reason
//! - `proxy_async_search_registry_size` (gauge): stored registry keys
//!
//! All recorders are no-ops until [`init_metrics`] installs an exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(backend: &'static str, route: &'static str, status: u16, start: Instant) {
    counter!(
        "proxy_requests_total",
        "backend" => backend,
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "backend" => backend)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(backend: &'static str) {
    counter!("proxy_upstream_errors_total", "backend" => backend).increment(1);
}

pub fn record_async_search_id(registry_size: usize) {
    counter!("proxy_async_search_ids_recorded_total").increment(1);
    gauge!("proxy_async_search_registry_size").set(registry_size as f64);
}

pub fn record_capture_failure(reason: &'static str) {
    counter!("proxy_async_search_capture_failures_total", "reason" => reason).increment(1);
}
