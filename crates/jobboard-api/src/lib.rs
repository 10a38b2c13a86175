//! Axum HTTP API server for the job board.
//!
//! This crate provides:
//! - Account registration and login with Argon2 password hashes and HS256 tokens
//! - Job posting, application and profile endpoints with role and ownership checks
//! - Rate limiting, security headers and request ids
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
