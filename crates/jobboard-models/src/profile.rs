//! Candidate profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids::{ProfileId, UserId};
use crate::list_input::ListInput;
use crate::serde_ext::nullable_int;
use crate::user::UserSummary;

/// Bounds for `years_of_experience`.
pub const YEARS_OF_EXPERIENCE_RANGE: std::ops::RangeInclusive<i32> = 0..=50;

/// Career profile, one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Vec<String>,
    /// Reference to an uploaded resume file.
    pub resume: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    /// Private profiles are only visible to their owner.
    pub is_public: bool,
    pub years_of_experience: Option<i32>,
    pub current_salary: Option<String>,
    pub expected_salary: Option<String>,
    pub preferred_job_type: Vec<String>,
    pub preferred_location: Vec<String>,
    pub is_remote_preferred: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile joined with its owner's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWithUser {
    #[serde(flatten)]
    pub profile: Profile,
    pub user: UserSummary,
}

/// `{ "profile": ... }` envelope returned by profile reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: ProfileWithUser,
}

/// `{ "message": ..., "profile": ... }` envelope returned by upserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMutationResponse {
    pub message: String,
    pub profile: Profile,
}

/// Create-or-update payload. On update, absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Headline must be at most 200 characters"))]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub skills: Option<ListInput>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    /// Absent: unchanged. `null`/`""`: unset. Number: set.
    #[serde(
        default,
        deserialize_with = "nullable_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub years_of_experience: Option<Option<i32>>,
    #[serde(default)]
    pub current_salary: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<String>,
    #[serde(default)]
    pub preferred_job_type: Option<ListInput>,
    #[serde(default)]
    pub preferred_location: Option<ListInput>,
    #[serde(default)]
    pub is_remote_preferred: Option<bool>,
}

impl UpsertProfileRequest {
    /// Check constraints the derive cannot express on the tri-state field.
    pub fn check_years_of_experience(&self) -> Result<(), String> {
        match self.years_of_experience {
            Some(Some(years)) if !YEARS_OF_EXPERIENCE_RANGE.contains(&years) => Err(format!(
                "Years of experience must be between {} and {}",
                YEARS_OF_EXPERIENCE_RANGE.start(),
                YEARS_OF_EXPERIENCE_RANGE.end()
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_of_experience_bounds() {
        let mut req = UpsertProfileRequest {
            years_of_experience: Some(Some(51)),
            ..Default::default()
        };
        assert!(req.check_years_of_experience().is_err());

        req.years_of_experience = Some(Some(50));
        assert!(req.check_years_of_experience().is_ok());

        req.years_of_experience = Some(None);
        assert!(req.check_years_of_experience().is_ok());
    }

    #[test]
    fn test_upsert_request_from_form_payload() {
        let req: UpsertProfileRequest = serde_json::from_value(serde_json::json!({
            "headline": "Rust developer",
            "skills": "Rust, Tokio ,SQL",
            "years_of_experience": "",
            "preferred_location": ["Berlin", " Remote "],
            "is_public": false
        }))
        .unwrap();
        assert_eq!(req.years_of_experience, Some(None));
        assert_eq!(req.skills.unwrap().into_list(), vec!["Rust", "Tokio", "SQL"]);
        assert_eq!(
            req.preferred_location.unwrap().into_list(),
            vec!["Berlin", "Remote"]
        );
        assert_eq!(req.is_public, Some(false));
    }

    #[test]
    fn test_headline_length_validated() {
        let req = UpsertProfileRequest {
            headline: Some("x".repeat(201)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
