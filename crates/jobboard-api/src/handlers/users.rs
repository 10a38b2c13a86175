//! Admin user management.

use axum::extract::State;
use axum::Json;

use jobboard_models::UsersResponse;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = state.auth.list_users().await?;
    Ok(Json(UsersResponse { users }))
}
