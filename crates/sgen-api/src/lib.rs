//! Axum HTTP API server.
//!
//! This crate provides:
//! - Job submission and status/result retrieval endpoints
//! - Bundle download endpoint
//! - Security headers, request IDs, and request logging

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
