//! HTTP API for job submission and status polling
//!
//! Three routes, all JSON:
//!
//! - `POST /api/jobs` submits a URL for analysis
//! - `GET /api/jobs/:id` returns one job record
//! - `GET /api/jobs` returns every job record
//!
//! Every failure is reported as `400 {"error": true, "message": ...}`,
//! whether the cause was a bad request or a store fault.

mod handlers;

pub use handlers::{CreateJobRequest, CreateJobResponse, ErrorResponse};

use crate::service::JobService;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<JobService>,
}

/// Builds the application router with CORS and request tracing
pub fn build_router(service: Arc<JobService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/jobs",
            post(handlers::create_job).get(handlers::list_jobs),
        )
        .route("/api/jobs/:id", get(handlers::job_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}
