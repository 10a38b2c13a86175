//! Application handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use jobboard_models::{
    ApplicationId, ApplicationMutationResponse, ApplicationWithApplicant, ApplicationWithJob,
    ApplyRequest, JobId, UpdateStatusRequest,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn apply_for_job(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(job_id), _): WithRejection<Path<JobId>, ApiError>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ApplicationMutationResponse>)> {
    let req = apply_request(&body)?;
    let application = state.applications.apply(job_id, &user, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationMutationResponse {
            message: "Application submitted successfully".to_string(),
            application,
        }),
    ))
}

/// The apply body is optional: an empty body applies without a cover letter.
fn apply_request(body: &[u8]) -> ApiResult<ApplyRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApplyRequest::default());
    }
    let Json(req) = Json::<ApplyRequest>::from_bytes(body)?;
    Ok(req)
}

pub async fn my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ApplicationWithJob>>> {
    Ok(Json(state.applications.list_mine(&user).await?))
}

/// Applicants for one job, visible to its poster and admins.
pub async fn job_applications(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(job_id), _): WithRejection<Path<JobId>, ApiError>,
) -> ApiResult<Json<Vec<ApplicationWithApplicant>>> {
    Ok(Json(state.applications.list_for_job(job_id, &user).await?))
}

pub async fn update_application_status(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<ApplicationId>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateStatusRequest>, ApiError>,
) -> ApiResult<Json<ApplicationMutationResponse>> {
    let application = state.applications.update_status(id, &user, req).await?;

    Ok(Json(ApplicationMutationResponse {
        message: "Application status updated successfully".to_string(),
        application,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_apply_body_is_default() {
        let req = apply_request(b"").unwrap();
        assert!(req.cover_letter.is_none());
        assert!(apply_request(b"  \n").unwrap().resume.is_none());
    }

    #[test]
    fn test_apply_body_is_parsed_or_rejected() {
        let req = apply_request(br#"{"coverLetter": "Hi"}"#).unwrap();
        assert_eq!(req.cover_letter.as_deref(), Some("Hi"));

        let err = apply_request(b"{not json").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
