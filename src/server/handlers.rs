//! Request handlers and their wire types

use super::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/jobs`
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub url: String,
}

/// Success body of `POST /api/jobs`
#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub id: String,
    pub error: bool,
}

/// Failure body shared by every route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: true,
            message,
        }),
    )
        .into_response()
}

/// Submits a URL for analysis
///
/// The raw body is decoded by hand so a malformed or non-UTF-8 payload
/// reports the decoder message in the standard error shape instead of an
/// extractor rejection.
pub async fn create_job(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CreateJobRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.service.submit(&request.url) {
        Ok(job) => (
            StatusCode::OK,
            Json(CreateJobResponse {
                id: job.id,
                error: false,
            }),
        )
            .into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

/// Returns the full record for one job
pub async fn job_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.job(&id) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

/// Returns every job record, oldest first
pub async fn list_jobs(State(state): State<AppState>) -> Response {
    match state.service.jobs() {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}
