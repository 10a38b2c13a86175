//! Ownership rule shared by job and application mutations.

use tracing::warn;

use jobboard_models::UserId;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

/// Allow the resource owner and admins; everyone else gets `Forbidden(message)`.
pub fn ensure_owner_or_admin(owner: UserId, actor: &AuthUser, message: &str) -> ApiResult<()> {
    if actor.id == owner || actor.is_admin() {
        return Ok(());
    }

    warn!(owner = %owner, actor = %actor.id, "Ownership check failed");
    Err(ApiError::forbidden(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jobboard_models::{Role, User};

    fn actor(id: i64, role: Role) -> AuthUser {
        let now = Utc::now();
        AuthUser::new(User {
            id: UserId(id),
            name: "Someone".into(),
            email: format!("user{id}@example.com"),
            role,
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn test_owner_allowed() {
        assert!(ensure_owner_or_admin(UserId(1), &actor(1, Role::Employer), "no").is_ok());
    }

    #[test]
    fn test_admin_allowed_on_any_resource() {
        assert!(ensure_owner_or_admin(UserId(1), &actor(9, Role::Admin), "no").is_ok());
    }

    #[test]
    fn test_other_user_forbidden_with_message() {
        let err = ensure_owner_or_admin(UserId(1), &actor(2, Role::Employer), "Not yours")
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Not yours");
    }
}
