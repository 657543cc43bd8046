// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // IDENTIFICATION METRICS
    // ============================================================================

    /// Identification attempts by outcome
    pub static ref IDENTIFICATIONS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("identifications_total", "Total identification attempts"),
        &["outcome"], // outcome: success, unidentified, or an error kind
        REGISTRY
    ).expect("identifications_total registers");

    /// Images rejected before any request was made
    pub static ref UPLOADS_REJECTED: CounterVec = register_counter_vec_with_registry!(
        Opts::new("uploads_rejected_total", "Total rejected image selections"),
        &["reason"], // reason: unsupported_media_type, payload_too_large
        REGISTRY
    ).expect("uploads_rejected_total registers");

    // ============================================================================
    // GEMINI API METRICS
    // ============================================================================

    /// Total Gemini API calls
    pub static ref GEMINI_API_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("gemini_api_calls_total", "Total Gemini API calls"),
        &["model", "status_code"], // status_code 0: transport failure
        REGISTRY
    ).expect("gemini_api_calls_total registers");

    /// Gemini API call duration
    pub static ref GEMINI_API_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("gemini_api_duration_seconds", "Gemini API call duration")
            .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
        REGISTRY
    ).expect("gemini_api_duration_seconds registers");
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        IDENTIFICATIONS_TOTAL.with_label_values(&["success"]).inc();
        UPLOADS_REJECTED.with_label_values(&["payload_too_large"]).inc();
        GEMINI_API_CALLS.with_label_values(&["gemini-test", "200"]).inc();
        GEMINI_API_DURATION.with_label_values(&["gemini-test"]).observe(0.5);

        let metrics = gather_metrics();
        assert!(metrics.contains("identifications_total"));
        assert!(metrics.contains("uploads_rejected_total"));
        assert!(metrics.contains("gemini_api_calls_total"));
        assert!(metrics.contains("gemini_api_duration_seconds"));
    }
}
