//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shell_page_renders_total` (counter): rendered views by kind
//! - `shell_bundle_loads_total` (counter): loader invocations by bundle, outcome
//! - `shell_proxy_requests_total` (counter): forwarded requests by method, status
//! - `shell_proxy_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels stay low-cardinality: route paths come from the static table

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a bundle loader invocation.
pub fn record_bundle_load(bundle: &str, success: bool) {
    ::metrics::counter!(
        "shell_bundle_loads_total",
        "bundle" => bundle.to_string(),
        "outcome" => if success { "ok" } else { "error" }
    )
    .increment(1);
}

/// Record a rendered view.
pub fn record_page_render(view: &'static str) {
    ::metrics::counter!("shell_page_renders_total", "view" => view).increment(1);
}

/// Record a forwarded request.
pub fn record_proxy_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    ::metrics::counter!(
        "shell_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    ::metrics::histogram!(
        "shell_proxy_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}
