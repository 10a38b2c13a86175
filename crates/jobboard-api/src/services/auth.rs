//! Account registration, login and credential management.

use tracing::{info, warn};
use validator::Validate;

use jobboard_db::{NewUser, UserRepository};
use jobboard_models::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateAccountRequest, User, UserId,
};

use crate::auth::{hash_password, verify_password, AuthUser, TokenService};
use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Same message for every login failure so callers cannot probe accounts.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// A user and a freshly issued token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: UserRepository, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, req: RegisterRequest) -> ApiResult<Session> {
        req.validate()?;

        let new_user = NewUser {
            name: req.name.trim().to_string(),
            email: normalize_email(&req.email),
            password_hash: hash_password(req.password).await?,
            role: req.role.unwrap_or_default(),
        };

        let user = match self.users.create(&new_user).await {
            Ok(user) => user,
            Err(e) if e.is_conflict() => {
                return Err(ApiError::validation("User already exists with this email"))
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, role = %user.role, "Registered user");
        let token = self.tokens.issue(&user)?;
        Ok(Session { user, token })
    }

    pub async fn login(&self, req: LoginRequest) -> ApiResult<Session> {
        let Some(credentials) = self
            .users
            .find_credentials_by_email(&normalize_email(&req.email))
            .await?
        else {
            return Err(login_failure("unknown_email"));
        };

        if !verify_password(req.password, credentials.password_hash).await? {
            return Err(login_failure("wrong_password"));
        }
        if !credentials.user.is_active {
            return Err(login_failure("inactive_account"));
        }

        let token = self.tokens.issue(&credentials.user)?;
        Ok(Session {
            user: credentials.user,
            token,
        })
    }

    /// Verify a bearer token and load the active user it names.
    pub async fn resolve_token(&self, token: &str) -> ApiResult<AuthUser> {
        let claims = self.tokens.verify(token)?;

        match self.users.find_by_id(UserId(claims.sub)).await? {
            Some(user) if user.is_active => Ok(AuthUser::new(user)),
            _ => Err(ApiError::unauthorized("Token is not valid")),
        }
    }

    /// Change the caller's name and/or email.
    pub async fn update_account(&self, actor: &AuthUser, req: UpdateAccountRequest) -> ApiResult<User> {
        req.validate()?;

        let name = req.name.as_deref().map(str::trim);
        let email = req.email.as_deref().map(normalize_email);

        match self.users.update_account(actor.id, name, email.as_deref()).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_conflict() => Err(ApiError::validation("Email is already in use")),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn change_password(&self, actor: &AuthUser, req: ChangePasswordRequest) -> ApiResult<()> {
        req.validate()?;

        let stored = self
            .users
            .password_hash(actor.id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if !verify_password(req.current_password, stored).await? {
            metrics::record_auth_failure("wrong_password");
            return Err(ApiError::unauthorized("Current password is incorrect"));
        }

        let hash = hash_password(req.new_password).await?;
        self.users.update_password(actor.id, &hash).await?;
        info!(user_id = %actor.id, "Password changed");
        Ok(())
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.users.list().await?)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn login_failure(reason: &'static str) -> ApiError {
    warn!(reason, "Login rejected");
    metrics::record_auth_failure(reason);
    ApiError::unauthorized(INVALID_CREDENTIALS)
}
