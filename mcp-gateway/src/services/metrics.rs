//! Metrics collection for mcp-gateway.
//!
//! HTTP series come from `service_core`'s middleware through the `metrics`
//! facade and are captured by a Prometheus recorder. Backend call series
//! live in a separate `prometheus` registry. `/metrics` renders both.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS: OnceLock<GatewayMetrics> = OnceLock::new();

struct GatewayMetrics {
    recorder: Option<PrometheusHandle>,
    registry: Registry,
    backend_requests_total: IntCounterVec,
    backend_request_duration_seconds: HistogramVec,
}

impl GatewayMetrics {
    fn new() -> Self {
        let recorder = match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Prometheus recorder");
                None
            }
        };

        let registry = Registry::new();

        let backend_requests_total = IntCounterVec::new(
            Opts::new(
                "backend_requests_total",
                "Total number of requests forwarded to the backend",
            ),
            &["endpoint", "outcome"],
        )
        .expect("metric can be created");

        let backend_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "backend_request_duration_seconds",
                "Backend round-trip duration in seconds",
            ),
            &["endpoint"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(backend_requests_total.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(backend_request_duration_seconds.clone()))
            .expect("collector can be registered");

        Self {
            recorder,
            registry,
            backend_requests_total,
            backend_request_duration_seconds,
        }
    }
}

/// Install the recorder and register the backend collectors. Only the first
/// call does any work.
pub fn init_metrics() {
    METRICS.get_or_init(GatewayMetrics::new);
}

/// Count one forwarded call. `outcome` is `success` or `failure`.
pub fn record_backend_call(endpoint: &str, outcome: &str, elapsed: Duration) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .backend_requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
        metrics
            .backend_request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(elapsed.as_secs_f64());
    }
}

/// Render recorder and registry in Prometheus text format.
pub fn get_metrics() -> String {
    let Some(metrics) = METRICS.get() else {
        return "# Metrics recorder not initialized\n".to_string();
    };

    let mut output = metrics
        .recorder
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&metrics.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return output;
    }
    if let Ok(backend_metrics) = String::from_utf8(buffer) {
        output.push_str(&backend_metrics);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_calls_show_up_in_exposition() {
        init_metrics();
        init_metrics();

        record_backend_call("mcp_servers", "success", Duration::from_millis(12));
        metrics::counter!("http_requests_total", "path" => "/api/mcp-servers").increment(1);

        let text = get_metrics();
        assert!(text.contains("backend_requests_total"));
        assert!(text.contains("endpoint=\"mcp_servers\""));
        assert!(text.contains("backend_request_duration_seconds"));
        assert!(text.contains("http_requests_total"));
    }

    #[test]
    fn concurrent_initialisation_shares_one_registry() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(init_metrics))
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        record_backend_call("mcp_server_test", "failure", Duration::from_millis(3));

        let text = get_metrics();
        assert!(text.contains("endpoint=\"mcp_server_test\",outcome=\"failure\""));
    }
}
