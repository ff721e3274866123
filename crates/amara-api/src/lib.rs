//! Axum HTTP API server.
//!
//! This crate provides:
//! - Signed upload and signed read endpoints over the storage backend
//! - Upload destination resolution for admin forms
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
