//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload and retrieval endpoints
//! - HS256 bearer token authentication
//! - Security headers, request ids and request logging
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::{AuthUser, Claims, JwtVerifier};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
