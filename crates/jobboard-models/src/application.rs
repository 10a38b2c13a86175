//! Job application models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ParseEnumError;
use crate::ids::{ApplicationId, JobId, UserId};
use crate::job::JobWithPoster;
use crate::profile::Profile;
use crate::serde_ext::{optional_datetime, optional_text};
use crate::user::UserSummary;

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ParseEnumError::new("application status", other)),
        }
    }
}

/// An application of one user to one job. At most one exists per
/// (job, applicant) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: UserId,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    /// Reference to an uploaded resume file.
    pub resume: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<UserId>,
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with its job and the job's poster (id and name only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: JobWithPoster,
}

/// Applicant identity with their profile, if they created one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantView {
    #[serde(flatten)]
    pub user: UserSummary,
    pub profile: Option<Profile>,
}

/// Application joined with the applicant, as seen by the job's poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: Application,
    pub applicant: ApplicantView,
}

/// `{ "message": ..., "application": ... }` envelope returned by mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationMutationResponse {
    pub message: String,
    pub application: Application,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 10000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 255, message = "Resume reference is too long"))]
    pub resume: Option<String>,
}

/// Review decision. Notes and interview details change only when supplied.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(length(max = 255, message = "Interview location is too long"))]
    pub interview_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Shortlisted).unwrap(),
            r#""shortlisted""#
        );
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_update_status_request_parses_form_dates() {
        let req: UpdateStatusRequest = serde_json::from_value(serde_json::json!({
            "status": "shortlisted",
            "notes": "Strong portfolio",
            "interviewDate": "2030-05-02T14:00",
            "interviewLocation": "Office 3"
        }))
        .unwrap();
        assert_eq!(req.status, ApplicationStatus::Shortlisted);
        assert!(req.interview_date.is_some());
        assert_eq!(req.interview_location.as_deref(), Some("Office 3"));
    }

    #[test]
    fn test_update_status_requires_status() {
        let err = serde_json::from_value::<UpdateStatusRequest>(serde_json::json!({"notes": "x"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_apply_request_is_optional() {
        let req: ApplyRequest = serde_json::from_str("{}").unwrap();
        assert!(req.cover_letter.is_none());
        assert!(req.resume.is_none());
    }
}
