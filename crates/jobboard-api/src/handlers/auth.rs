//! Account handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use jobboard_models::{
    AccountResponse, AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, UpdateAccountRequest, UserResponse,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Create an account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.auth.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: session.user,
            token: session.token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state.auth.login(req).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: session.user,
        token: session.token,
    }))
}

/// The caller's own account.
pub async fn me(user: AuthUser) -> Json<UserResponse> {
    Json(UserResponse { user: user.user })
}

pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<UpdateAccountRequest>, ApiError>,
) -> ApiResult<Json<AccountResponse>> {
    let updated = state.auth.update_account(&user, req).await?;

    Ok(Json(AccountResponse {
        message: "Profile updated successfully".to_string(),
        user: updated,
    }))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<ChangePasswordRequest>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    state.auth.change_password(&user, req).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
