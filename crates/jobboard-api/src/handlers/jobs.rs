//! Job posting handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use jobboard_models::{
    CreateJobRequest, Job, JobFilter, JobId, JobMutationResponse, JobPage, JobWithPoster,
    MessageResponse, UpdateJobRequest,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Public, filtered and paginated listing of active jobs.
pub async fn list_jobs(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<JobFilter>, ApiError>,
) -> ApiResult<Json<JobPage>> {
    Ok(Json(state.jobs.list(&filter).await?))
}

pub async fn get_job(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<JobId>, ApiError>,
) -> ApiResult<Json<JobWithPoster>> {
    Ok(Json(state.jobs.get(id).await?))
}

pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateJobRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<JobMutationResponse>)> {
    let job = state.jobs.create(&user, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobMutationResponse {
            message: "Job created successfully".to_string(),
            job,
        }),
    ))
}

pub async fn update_job(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<JobId>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateJobRequest>, ApiError>,
) -> ApiResult<Json<JobMutationResponse>> {
    let job = state.jobs.update(id, &user, req).await?;

    Ok(Json(JobMutationResponse {
        message: "Job updated successfully".to_string(),
        job,
    }))
}

pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<JobId>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    state.jobs.delete(id, &user).await?;
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// Jobs posted by the caller, active or not.
pub async fn my_jobs(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Job>>> {
    Ok(Json(state.jobs.list_mine(&user).await?))
}
