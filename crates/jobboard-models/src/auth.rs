//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::user::{Role, User};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, max = 100, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Update of the caller's own account identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
}

/// Issued on register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

/// `{ "user": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// `{ "message": ..., "user": ... }` returned by account updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub message: String,
    pub user: User,
}

/// Admin listing of every account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("Ada", "ada@example.com", "secret1").validate().is_ok());
        assert!(register("A", "ada@example.com", "secret1").validate().is_err());
        assert!(register("Ada", "not-an-email", "secret1").validate().is_err());
        assert!(register("Ada", "ada@example.com", "12345").validate().is_err());
    }

    #[test]
    fn test_change_password_uses_camel_case() {
        let req: ChangePasswordRequest = serde_json::from_str(
            r#"{"currentPassword":"old-secret","newPassword":"new-secret"}"#,
        )
        .unwrap();
        assert_eq!(req.current_password, "old-secret");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_account_skips_absent_fields() {
        let req: UpdateAccountRequest = serde_json::from_str(r#"{"name":"Grace"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.email.is_none());

        let bad: UpdateAccountRequest = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
