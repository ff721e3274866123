//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::storage::{create_signed_upload, get_signed_url, resolve_path};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let storage_routes = Router::new()
        .route("/storage/signed-upload", post(create_signed_upload))
        .route("/storage/get-signed-url", post(get_signed_url))
        .route("/storage/resolve-path", post(resolve_path));

    // Signing endpoints are cheap but privileged; rate limit per IP
    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = storage_routes.layer(middleware::from_fn_with_state(
        rate_limiter,
        rate_limit_middleware,
    ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
