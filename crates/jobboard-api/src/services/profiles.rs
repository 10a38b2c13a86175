//! Career profiles.

use tracing::info;
use validator::Validate;

use jobboard_db::{ProfileChanges, ProfileRepository};
use jobboard_models::{Profile, ProfileWithUser, UpsertProfileRequest, UserId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct ProfileService {
    profiles: ProfileRepository,
}

impl ProfileService {
    pub fn new(profiles: ProfileRepository) -> Self {
        Self { profiles }
    }

    pub async fn get_own(&self, actor: &AuthUser) -> ApiResult<ProfileWithUser> {
        self.profiles
            .find_by_user(actor.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))
    }

    /// Create the caller's profile or apply the supplied fields to it.
    pub async fn upsert(&self, actor: &AuthUser, req: UpsertProfileRequest) -> ApiResult<Profile> {
        req.validate()?;
        req.check_years_of_experience().map_err(ApiError::validation)?;

        let upserted = self
            .profiles
            .upsert(actor.id, &ProfileChanges::from(req))
            .await?;
        info!(user_id = %actor.id, created = upserted.created, "Profile saved");
        Ok(upserted.profile)
    }

    /// A profile only when it is public. Private and missing look the same.
    pub async fn get_public(&self, user_id: UserId) -> ApiResult<ProfileWithUser> {
        self.profiles
            .find_public(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found or not public"))
    }
}
