// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, GEMINI_API_CALLS, GEMINI_API_DURATION, IDENTIFICATIONS_TOTAL,
    UPLOADS_REJECTED,
};

/// Helper to record Gemini API call metrics
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record how an identification attempt ended
pub fn record_identification(outcome: &str) {
    IDENTIFICATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Helper to record a rejected image selection
pub fn record_rejected_upload(reason: &str) {
    UPLOADS_REJECTED.with_label_values(&[reason]).inc();
}
