//! Password hashing, token issuance and the authentication/role guards.

use std::time::Duration;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use jobboard_models::{Role, User, UserId};

use crate::config::JwtConfig;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Signed token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Role at issue time
    pub role: Role,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// HS256 token issuer and verifier.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.expires_in,
        }
    }

    /// Issue a token for `user`.
    pub fn issue(&self, user: &User) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.get(),
            role: user.role,
            iat: now,
            exp: i64::try_from(self.ttl.as_secs())
                .ok()
                .and_then(|ttl| now.checked_add(ttl))
                .unwrap_or(i64::MAX),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {e}")))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token validation failed: {}", e);
                ApiError::unauthorized("Token is not valid")
            })
    }
}

/// Hash a password into a PHC string (Argon2id, random salt).
pub async fn hash_password(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::internal(format!("Failed to hash password: {e}")))
    })
    .await
    .map_err(|e| ApiError::internal(format!("Hashing task failed: {e}")))?
}

/// Check `password` against a stored PHC string.
pub async fn verify_password(password: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| ApiError::internal(format!("Stored password hash is invalid: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| ApiError::internal(format!("Hashing task failed: {e}")))?
}

/// Authenticated caller, resolved from a bearer token to a stored active user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
    pub user: User,
}

impl AuthUser {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            user,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Reads the user placed in request extensions by [`authenticate`].
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))
    }
}

/// Require a valid bearer token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| {
            metrics::record_auth_failure("missing_token");
            ApiError::unauthorized("No token, authorization denied")
        })?;

    let user = state.auth.resolve_token(token.token()).await.inspect_err(|_| {
        metrics::record_auth_failure("invalid_token");
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Role allow-list for [`require_roles`].
#[derive(Debug, Clone, Copy)]
pub struct RoleGuard(pub &'static [Role]);

impl RoleGuard {
    pub const EMPLOYER: Self = Self(&[Role::Employer, Role::Admin]);
    pub const JOBSEEKER: Self = Self(&[Role::Jobseeker]);
    pub const ADMIN: Self = Self(&[Role::Admin]);
}

/// Reject authenticated users whose role is not allowed. Must run inside
/// [`authenticate`].
pub async fn require_roles(
    State(RoleGuard(allowed)): State<RoleGuard>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let role = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| (user.id, user.role))
        .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))?;

    if !allowed.contains(&role.1) {
        warn!(user_id = %role.0, role = %role.1, path = %request.uri().path(), "Role not permitted");
        metrics::record_auth_failure("forbidden_role");
        return Err(ApiError::forbidden("Access denied. Insufficient permissions."));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: UserId(7),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role,
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenService::new(&JwtConfig::default());
        let token = tokens.issue(&user(Role::Employer)).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Employer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = TokenService::new(&JwtConfig {
            secret: "one-secret".into(),
            expires_in: Duration::from_secs(60),
        });
        let verifier = TokenService::new(&JwtConfig {
            secret: "another-secret".into(),
            expires_in: Duration::from_secs(60),
        });

        let token = issuer.issue(&user(Role::Jobseeker)).unwrap();
        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        assert!(verifier.verify("not.a.token").is_err());
    }

    #[test]
    fn test_huge_lifetime_saturates_expiry() {
        let tokens = TokenService::new(&JwtConfig {
            secret: "secret".into(),
            expires_in: Duration::from_secs(u64::MAX),
        });
        let token = tokens.issue(&user(Role::Employer)).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new(&JwtConfig::default());
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::Admin,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("secret1".into()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("secret2".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_salts_differ() {
        let a = hash_password("same".into()).await.unwrap();
        let b = hash_password("same".into()).await.unwrap();
        assert_ne!(a, b);
    }
}
