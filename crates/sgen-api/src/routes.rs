//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{health, ready};
use crate::handlers::jobs::{job_bundle, job_result, job_status, submit_job};
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/jobs", post(submit_job))
        .route("/jobs/:job_id", get(job_status))
        .route("/jobs/:job_id/result", get(job_result))
        .route("/jobs/:job_id/bundle", get(job_bundle));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
