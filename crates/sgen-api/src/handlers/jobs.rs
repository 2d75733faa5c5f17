//! Job API handlers.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use url::Url;

use sgen_models::{JobId, JobResult, JobState, ShortsJob};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Job submission request.
#[derive(Deserialize)]
pub struct SubmitJobRequest {
    pub url: String,
}

/// Job submission response.
#[derive(Serialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
}

/// Submit a video URL for processing.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> ApiResult<(StatusCode, Json<SubmitJobResponse>)> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(ApiError::bad_request("url must not be empty"));
    }

    let parsed = Url::parse(url).map_err(|_| ApiError::bad_request("url is not a valid URL"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::bad_request("url must use http or https"));
    }

    let job = ShortsJob::new(url);
    let job_id = job.job_id.clone();

    state.queue.enqueue(job);
    tracing::info!(job_id = %job_id, %url, "Job submitted");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitJobResponse {
            job_id: job_id.as_str().to_string(),
        }),
    ))
}

/// Job status response.
#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<usize>,
}

/// Get job status.
///
/// The status is derived: a stored result means the job is terminal, the
/// slot holder is processing, anything still in the queue is queued.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let id = JobId::from_string(&job_id);

    let (state_label, queue_position) = if let Some(result) = state.results.get(&id) {
        let label = if result.is_completed() {
            JobState::Completed
        } else {
            JobState::Failed
        };
        (label, None)
    } else if state.queue.processing_job().as_ref() == Some(&id) {
        (JobState::Processing, None)
    } else if let Some(position) = state.queue.position(&id) {
        (JobState::Queued, Some(position))
    } else {
        return Err(ApiError::not_found("job not found"));
    };

    Ok(Json(JobStatusResponse {
        job_id,
        status: state_label.as_str().to_string(),
        queue_position,
    }))
}

/// Get the result of a finished job.
pub async fn job_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobResult>> {
    let id = JobId::from_string(&job_id);

    match state.results.get(&id) {
        Some(result) => Ok(Json(result)),
        None if state.queue.processing_job().as_ref() == Some(&id)
            || state.queue.position(&id).is_some() =>
        {
            Err(ApiError::not_found("job has not finished yet"))
        }
        None => Err(ApiError::not_found("job not found")),
    }
}

/// Download the zip bundle of a completed job.
pub async fn job_bundle(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let id = JobId::from_string(&job_id);

    let result = state
        .results
        .get(&id)
        .ok_or_else(|| ApiError::not_found("job not found"))?;

    let bundle = match result {
        JobResult::Completed { bundle, .. } => bundle,
        JobResult::Failed { .. } => return Err(ApiError::not_found("job failed, no bundle")),
    };

    let bytes = tokio::fs::read(&bundle).await?;
    let filename = bundle
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("shorts_bundle.zip");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
