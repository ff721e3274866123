//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "amara_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "amara_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "amara_http_requests_in_flight";

    // Storage metrics
    pub const SIGNED_READ_URLS_TOTAL: &str = "amara_signed_read_urls_total";
    pub const SIGNED_UPLOAD_URLS_TOTAL: &str = "amara_signed_upload_urls_total";
    pub const SIGNING_DURATION_SECONDS: &str = "amara_signing_duration_seconds";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "amara_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a signed read URL issued.
pub fn record_signed_read_url(bucket: &str) {
    let labels = [("bucket", bucket.to_string())];
    counter!(names::SIGNED_READ_URLS_TOTAL, &labels).increment(1);
}

/// Record a signed upload URL issued.
pub fn record_signed_upload_url(bucket: &str) {
    let labels = [("bucket", bucket.to_string())];
    counter!(names::SIGNED_UPLOAD_URLS_TOTAL, &labels).increment(1);
}

/// Record time spent waiting on the storage backend to sign a URL.
pub fn record_signing_duration(duration_secs: f64) {
    histogram!(names::SIGNING_DURATION_SECONDS).record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
