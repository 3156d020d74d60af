//! Job management API handlers
//!
//! All handlers run behind `require_auth`; the caller's identity scopes
//! every read and write.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use jobtrack_auth::AuthUser;
use jobtrack_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::JobsState;
use crate::domain::entities::{Job, JobChanges, JobStatus};

/// Single-job response envelope
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Job,
}

/// Job list response
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub count: i64,
}

/// Query parameters for listing jobs
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    pub status: Option<JobStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request for creating a job
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub company: String,

    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub position: String,

    pub status: Option<JobStatus>,
}

/// Request for updating a job
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
}

impl From<UpdateJobRequest> for JobChanges {
    fn from(req: UpdateJobRequest) -> Self {
        Self {
            company: req.company,
            position: req.position,
            status: req.status,
        }
    }
}

fn job_not_found(id: Uuid) -> Error {
    Error::NotFound(format!("No job with id {}", id))
}

fn job_id(path: std::result::Result<Path<Uuid>, PathRejection>) -> Result<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| Error::Validation("Job id must be a valid UUID".to_string()))
}

/// GET /api/v1/jobs: list the caller's jobs
pub async fn list_jobs(
    AuthUser(ctx): AuthUser,
    State(state): State<JobsState>,
    params: std::result::Result<Query<ListJobsParams>, QueryRejection>,
) -> Result<Json<JobListResponse>> {
    let Query(params) = params.map_err(|e| Error::Validation(e.body_text()))?;
    let page = Pagination {
        offset: params.offset,
        limit: params.limit,
    };

    let jobs = state
        .repos
        .jobs
        .list_for_owner(ctx.user_id, params.status, page.limit(), page.offset())
        .await?;
    let count = state
        .repos
        .jobs
        .count_for_owner(ctx.user_id, params.status)
        .await?;

    Ok(Json(JobListResponse { jobs, count }))
}

/// POST /api/v1/jobs: create a job owned by the caller
pub async fn create_job(
    AuthUser(ctx): AuthUser,
    State(state): State<JobsState>,
    ValidatedJson(req): ValidatedJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>)> {
    let job = Job::new(ctx.user_id, &req.company, &req.position, req.status)?;
    let job = state.repos.jobs.create(&job).await?;

    tracing::info!(job_id = %job.id, user_id = %ctx.user_id, "Job created");

    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    AuthUser(ctx): AuthUser,
    State(state): State<JobsState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JobResponse>> {
    let id = job_id(path)?;
    let job = state
        .repos
        .jobs
        .find_for_owner(id, ctx.user_id)
        .await?
        .ok_or_else(|| job_not_found(id))?;

    Ok(Json(JobResponse { job }))
}

/// PATCH /api/v1/jobs/{id}
pub async fn update_job(
    AuthUser(ctx): AuthUser,
    State(state): State<JobsState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    ValidatedJson(req): ValidatedJson<UpdateJobRequest>,
) -> Result<Json<JobResponse>> {
    let id = job_id(path)?;
    let changes = JobChanges::from(req);
    if changes.is_empty() {
        return Err(Error::Validation(
            "Provide at least one of company, position or status".to_string(),
        ));
    }

    let mut job = state
        .repos
        .jobs
        .find_for_owner(id, ctx.user_id)
        .await?
        .ok_or_else(|| job_not_found(id))?;
    job.apply(changes)?;

    let job = state
        .repos
        .jobs
        .update(&job)
        .await?
        .ok_or_else(|| job_not_found(id))?;

    Ok(Json(JobResponse { job }))
}

/// DELETE /api/v1/jobs/{id}
pub async fn delete_job(
    AuthUser(ctx): AuthUser,
    State(state): State<JobsState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JobResponse>> {
    let id = job_id(path)?;
    let job = state
        .repos
        .jobs
        .delete_for_owner(id, ctx.user_id)
        .await?
        .ok_or_else(|| job_not_found(id))?;

    tracing::info!(job_id = %job.id, user_id = %ctx.user_id, "Job deleted");

    Ok(Json(JobResponse { job }))
}
