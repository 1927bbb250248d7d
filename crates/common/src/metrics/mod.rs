//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, Unit};

/// Metrics prefix for all ScholarFlow metrics
pub const METRICS_PREFIX: &str = "scholarflow";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Manuscript lifecycle transitions, labeled by from/to status"
    );

    describe_counter!(
        format!("{}_notifications_total", METRICS_PREFIX),
        Unit::Count,
        "In-app notifications persisted"
    );

    describe_counter!(
        format!("{}_mail_failures_total", METRICS_PREFIX),
        Unit::Count,
        "Best-effort mail sends that failed (swallowed)"
    );
}

/// Record a completed lifecycle transition
pub fn record_transition(from: &'static str, to: &'static str) {
    counter!(
        format!("{}_transitions_total", METRICS_PREFIX),
        "from" => from,
        "to" => to,
    )
    .increment(1);
}

/// Record a persisted in-app notification
pub fn record_notification() {
    counter!(format!("{}_notifications_total", METRICS_PREFIX)).increment(1);
}

/// Record a swallowed mail-send failure
pub fn record_mail_failure() {
    counter!(format!("{}_mail_failures_total", METRICS_PREFIX)).increment(1);
}
