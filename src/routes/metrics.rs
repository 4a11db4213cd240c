//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "hf_relay_requests_total",
        "Total number of relayed requests by method and upstream status"
    );
    metrics::describe_counter!(
        "hf_relay_upstream_errors_total",
        "Relayed requests that failed before an upstream response arrived"
    );
    metrics::describe_histogram!(
        "hf_relay_request_duration_seconds",
        "Relayed request duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a relayed request that got an upstream response
pub fn record_request(method: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "hf_relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("hf_relay_request_duration_seconds", "method" => method.to_string())
        .record(duration_secs);
}

/// Record a transport failure
pub fn record_upstream_error(method: &str) {
    metrics::counter!("hf_relay_upstream_errors_total", "method" => method.to_string())
        .increment(1);
}
