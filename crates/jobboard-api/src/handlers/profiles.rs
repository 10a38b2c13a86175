//! Profile handlers.

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;

use jobboard_models::{ProfileMutationResponse, ProfileResponse, UpsertProfileRequest, UserId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.profiles.get_own(&user).await?;
    Ok(Json(ProfileResponse { profile }))
}

/// Create or update the caller's profile. Mounted on both POST and PUT.
pub async fn upsert_profile(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<UpsertProfileRequest>, ApiError>,
) -> ApiResult<Json<ProfileMutationResponse>> {
    let profile = state.profiles.upsert(&user, req).await?;

    Ok(Json(ProfileMutationResponse {
        message: "Profile updated successfully".to_string(),
        profile,
    }))
}

pub async fn public_profile(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, ApiError>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.profiles.get_public(user_id).await?;
    Ok(Json(ProfileResponse { profile }))
}
