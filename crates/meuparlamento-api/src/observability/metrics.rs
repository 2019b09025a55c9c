//! Metrics definitions for the meuParlamento API.
//!
//! All metrics follow Prometheus naming conventions:
//! - `api_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: HTTP methods
//! - `endpoint`: route templates, unknown paths collapse to `/other`
//! - `status`: 3 values (success, error, timeout), on duration histograms
//!   and the DB query counter
//! - `status_code`: the HTTP status code, on the HTTP request counter only
//! - `operation`: bounded by code (find_proposal, sample_proposals, etc.)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("api_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("api_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Full("api_batch_size".to_string()),
            &[1.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0],
        )
        .map_err(|e| format!("Failed to set batch size buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `api_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// Metric: `api_http_requests_total`
/// Labels: `method`, `endpoint`, `status_code`
///
/// This captures ALL HTTP responses including framework-level errors like
/// 404 Not Found and 405 Method Not Allowed.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("api_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("api_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion
///
/// Replaces proposal ids, batch sizes and dates with placeholders.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/metrics" | "/register_device" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

/// Normalize paths with dynamic segments
fn normalize_dynamic_endpoint(path: &str) -> String {
    let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    let normalized = match parts.as_slice() {
        ["proposals", "batch", _] => "/proposals/batch/{batch_size}",
        ["proposals", "recent", _] => "/proposals/recent/{batch_size}",
        ["proposals", "authors", _] => "/proposals/authors/{proposal_id}",
        ["proposals", "news", _] => "/proposals/news/{proposal_id}",
        ["proposals", "news", _, _] => "/proposals/news/{proposal_id}/{proposal_date}",
        // Unknown paths normalized to "/other" to bound cardinality
        _ => "/other",
    };

    normalized.to_string()
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record document store query execution
///
/// Metric: `api_db_query_duration_seconds`, `api_db_queries_total`
/// Labels: `operation`, `status`
///
/// Operations: find_proposal, sample_proposals, recent_proposals,
///             upsert_device, ping
pub fn record_db_query(operation: &str, status: &str, duration: Duration) {
    histogram!("api_db_query_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("api_db_queries_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Batch Metrics
// ============================================================================

/// Record the size of a served proposal batch
///
/// Metric: `api_batch_size`
/// Labels: `kind` (sampled, recent)
pub fn record_batch_size(kind: &'static str, size: usize) {
    histogram!("api_batch_size",
        "kind" => kind
    )
    .record(size as f64);
}

// ============================================================================
// Tests
// ============================================================================
