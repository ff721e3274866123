//! API middleware.

use std::collections::HashMap;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderValue, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tokio::sync::RwLock;
use tracing::{info, warn, Span};
use uuid::Uuid;

use crate::metrics;

/// Per-IP rate limiter using governor.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Maximum number of IPs to track in the rate limiter cache.
const MAX_RATE_LIMITER_ENTRIES: usize = 10_000;

/// IP-based rate limiter cache with automatic cleanup.
#[derive(Clone)]
pub struct RateLimiterCache {
    limiters: Arc<RwLock<HashMap<IpAddr, (Arc<IpRateLimiter>, Instant)>>>,
    quota: Quota,
    /// Time-to-live for cached rate limiters
    ttl: std::time::Duration,
}

impl RateLimiterCache {
    /// Create a new rate limiter cache.
    pub fn new(requests_per_second: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::new(10).unwrap()),
        );
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            quota,
            ttl: std::time::Duration::from_secs(3600),
        }
    }

    /// Drop expired entries, then oldest entries if still over capacity.
    async fn cleanup_expired(&self) {
        let mut limiters = self.limiters.write().await;
        let now = Instant::now();

        limiters.retain(|_, (_, created_at)| now.duration_since(*created_at) < self.ttl);

        if limiters.len() > MAX_RATE_LIMITER_ENTRIES {
            let mut entries: Vec<_> = limiters.iter().map(|(ip, (_, t))| (*ip, *t)).collect();
            entries.sort_by_key(|(_, t)| *t);

            let to_remove = limiters.len() - MAX_RATE_LIMITER_ENTRIES;
            for (ip, _) in entries.into_iter().take(to_remove) {
                limiters.remove(&ip);
            }
            warn!("Rate limiter cache exceeded capacity, removed {} entries", to_remove);
        }
    }

    /// Get or create a rate limiter for an IP.
    pub async fn get_limiter(&self, ip: IpAddr) -> Arc<IpRateLimiter> {
        {
            let limiters = self.limiters.read().await;
            if let Some((limiter, _)) = limiters.get(&ip) {
                return Arc::clone(limiter);
            }
        }

        let mut limiters = self.limiters.write().await;
        // Double-check after acquiring write lock
        if let Some((limiter, _)) = limiters.get(&ip) {
            return Arc::clone(limiter);
        }

        if limiters.len() >= MAX_RATE_LIMITER_ENTRIES {
            drop(limiters);
            self.cleanup_expired().await;
            limiters = self.limiters.write().await;
        }

        let limiter = Arc::new(RateLimiter::direct(self.quota));
        limiters.insert(ip, (Arc::clone(&limiter), Instant::now()));
        limiter
    }

    /// Check rate limit for an IP.
    pub async fn check(&self, ip: IpAddr) -> bool {
        let limiter = self.get_limiter(ip).await;
        limiter.check().is_ok()
    }
}

/// Create CORS layer.
pub fn cors_layer(origins: &[String]) -> tower_http::cors::CorsLayer {
    use axum::http::{header, Method};
    use tower_http::cors::{Any, CorsLayer};

    let allowed_headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
    ];

    let allowed_methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];

    if origins.iter().any(|o| o == "*") {
        // Wildcard origin: no credentials allowed, can use Any
        CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(std::time::Duration::from_secs(600))
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(true)
            .allow_origin(origins)
            .max_age(std::time::Duration::from_secs(600))
    }
}

/// Security headers middleware.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // All values below are compile-time constants known to parse.
    headers.insert(
        "X-Content-Type-Options",
        "nosniff".parse().expect("valid header value"),
    );
    headers.insert("X-Frame-Options", "DENY".parse().expect("valid header value"));
    headers.insert(
        "Strict-Transport-Security",
        "max-age=31536000; includeSubDomains"
            .parse()
            .expect("valid header value"),
    );
    headers.insert(
        "Referrer-Policy",
        "strict-origin-when-cross-origin"
            .parse()
            .expect("valid header value"),
    );
    headers.insert(
        "Cross-Origin-Resource-Policy",
        "same-origin".parse().expect("valid header value"),
    );

    response
}

/// Request ID middleware.
pub async fn request_id(mut request: Request<Body>, next: Next) -> Response<Body> {
    let request_id = request
        .headers()
        .get("X-Request-ID")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());
    Span::current().record("request_id", &request_id);

    let mut response = next.run(request).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// Request logging middleware.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();

    // Skip health check logging
    if uri.path() != "/health" && uri.path() != "/healthz" && uri.path() != "/ready" {
        info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

/// Rate limiting middleware using the per-IP limiter cache.
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<RateLimiterCache>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let ip = extract_client_ip(&request);

    if let Some(ip) = ip {
        if !rate_limiter.check(ip).await {
            warn!(ip = %ip, "Rate limit exceeded");
            metrics::record_rate_limit_hit(request.uri().path());
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", "1")],
                "Rate limit exceeded. Please try again later.",
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Extract client IP from request headers or connection info.
fn extract_client_ip(request: &Request<Body>) -> Option<IpAddr> {
    // X-Forwarded-For first (for proxied requests); first hop is the client
    if let Some(forwarded) = request.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = request.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.parse() {
                return Some(ip);
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip())
}
