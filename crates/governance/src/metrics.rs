//! Metrics implementation using Prometheus.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use mealroute_core::types::RouteMetadata;
use mealroute_core::{Error, Result};

/// Initialize Prometheus recorder and return the handle.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .map_err(|e| Error::initialization(format!("Failed to install Prometheus recorder: {}", e)))?;

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(handle)
}

/// Helper to track HTTP request metrics (latency, count).
pub fn track_request(method: &str, path: &str, status: u16, latency_sec: f64) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(latency_sec);
}

/// Count a routed request by its final route.
pub fn track_route(metadata: &RouteMetadata) {
    metrics::counter!(
        "mealroute_routes_total",
        "router_mode" => metadata.router_mode.as_str(),
        "heuristic_mode" => metadata.heuristic_mode.as_str(),
        "model_used" => if metadata.model_used { "true" } else { "false" }
    )
    .increment(1);
}

/// Count meals returned outside an enforced restaurant.
pub fn track_restaurant_violation(count: u64) {
    metrics::counter!("mealroute_restaurant_invariant_violations_total").increment(count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealroute_core::types::{HeuristicMode, RouterMode};

    #[test]
    fn test_tracking_without_recorder_is_noop() {
        track_request("POST", "/v1/chat", 200, 0.01);
        track_route(&RouteMetadata {
            model_used: false,
            router_mode: RouterMode::Meals,
            heuristic_mode: HeuristicMode::FoodIntent,
        });
        track_restaurant_violation(2);
    }

    #[test]
    fn test_recorder_renders_route_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            track_route(&RouteMetadata::rejected());
        });
        let rendered = handle.render();
        assert!(rendered.contains("mealroute_routes_total"));
        assert!(rendered.contains("router_mode=\"error\""));
    }
}
