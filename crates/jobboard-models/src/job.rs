//! Job posting models, filters and listing pages.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ParseEnumError;
use crate::ids::{JobId, UserId};
use crate::list_input::ListInput;
use crate::serde_ext::{
    nullable_datetime, nullable_text, optional_datetime, optional_parsed, optional_text,
};
use crate::user::UserSummary;

/// Default page size for job listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Employment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Freelance,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Freelance => "freelance",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "freelance" => Ok(JobType::Freelance),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            other => Err(ParseEnumError::new("job type", other)),
        }
    }
}

/// Seniority expected for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "executive" => Ok(ExperienceLevel::Executive),
            other => Err(ParseEnumError::new("experience level", other)),
        }
    }
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub company: String,
    pub salary: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub is_remote: bool,
    /// Inactive jobs are hidden from the public listing but stay retrievable by id.
    pub is_active: bool,
    pub posted_by: UserId,
    pub application_deadline: Option<DateTime<Utc>>,
    pub benefits: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job joined with the identity of its poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobWithPoster {
    #[serde(flatten)]
    pub job: Job,
    pub poster: UserSummary,
}

/// Public listing filters. Every filter is optional; supplied filters are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(default, deserialize_with = "optional_parsed")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "optional_parsed")]
    pub limit: Option<u32>,
    /// Substring match over title, description and requirements.
    #[serde(default, deserialize_with = "optional_text")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_parsed")]
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "optional_parsed")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, deserialize_with = "optional_parsed")]
    pub is_remote: Option<bool>,
    #[serde(default, deserialize_with = "optional_text")]
    pub company: Option<String>,
}

impl JobFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// Normalized page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Page defaults to 1, limit to [`DEFAULT_PAGE_SIZE`]; limit is clamped
    /// to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of the public job listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPage {
    pub jobs: Vec<JobWithPoster>,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u64,
}

/// `{ "message": ..., "job": ... }` envelope returned by job mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMutationResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Requirements are required"))]
    pub requirements: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Salary is required"))]
    pub salary: String,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub is_remote: Option<bool>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_text")]
    pub benefits: Option<String>,
    #[serde(default)]
    pub skills: Option<ListInput>,
}

/// Partial job update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[serde(default)]
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Requirements cannot be empty"))]
    pub requirements: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    pub company: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Salary cannot be empty"))]
    pub salary: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub is_remote: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    /// `Some(None)` clears the deadline.
    #[serde(
        default,
        deserialize_with = "nullable_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_deadline: Option<Option<DateTime<Utc>>>,
    /// `Some(None)` clears the benefits.
    #[serde(
        default,
        deserialize_with = "nullable_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub benefits: Option<Option<String>>,
    #[serde(default)]
    pub skills: Option<ListInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_wire_names() {
        assert_eq!(serde_json::to_string(&JobType::FullTime).unwrap(), r#""full-time""#);
        assert_eq!("part-time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert!("fulltime".parse::<JobType>().is_err());
    }

    #[test]
    fn test_experience_level_default_is_mid() {
        assert_eq!(ExperienceLevel::default(), ExperienceLevel::Mid);
        assert_eq!("executive".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Executive);
    }

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let p = Pagination::new(None, None);
        assert_eq!((p.page, p.limit, p.offset()), (1, 10, 0));

        let p = Pagination::new(Some(0), Some(1000));
        assert_eq!((p.page, p.limit), (1, MAX_PAGE_SIZE));

        let p = Pagination::new(Some(3), Some(0));
        assert_eq!((p.page, p.limit, p.offset()), (3, 1, 2));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination::new(Some(1), Some(10));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn test_create_request_camel_case_and_defaults() {
        let req: CreateJobRequest = serde_json::from_value(serde_json::json!({
            "title": "Backend Engineer",
            "description": "Build APIs",
            "requirements": "Rust",
            "location": "Remote",
            "company": "Acme",
            "salary": "$100k",
            "jobType": "contract",
            "isRemote": true,
            "applicationDeadline": "2030-01-15",
            "benefits": "",
            "skills": "Rust, SQL"
        }))
        .unwrap();
        assert_eq!(req.job_type, Some(JobType::Contract));
        assert_eq!(req.is_remote, Some(true));
        assert!(req.application_deadline.is_some());
        assert!(req.benefits.is_none());
        assert_eq!(req.skills.unwrap().into_list(), vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_create_request_validation() {
        let mut req = CreateJobRequest {
            title: "QA".into(),
            description: "d".into(),
            requirements: "r".into(),
            location: "l".into(),
            company: "c".into(),
            salary: "s".into(),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        req.title = "QA Engineer".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_clears_deadline_and_benefits() {
        let req: UpdateJobRequest = serde_json::from_value(serde_json::json!({
            "applicationDeadline": null,
            "benefits": ""
        }))
        .unwrap();
        assert_eq!(req.application_deadline, Some(None));
        assert_eq!(req.benefits, Some(None));

        let req: UpdateJobRequest = serde_json::from_value(serde_json::json!({
            "applicationDeadline": "2030-01-15",
            "benefits": "Remote budget"
        }))
        .unwrap();
        assert!(matches!(req.application_deadline, Some(Some(_))));
        assert_eq!(req.benefits, Some(Some("Remote budget".to_string())));

        let req: UpdateJobRequest = serde_json::from_str("{}").unwrap();
        assert!(req.application_deadline.is_none());
        assert!(req.benefits.is_none());
        assert_eq!(serde_json::to_value(&req).unwrap().get("benefits"), None);
    }

    #[test]
    fn test_filter_blank_text_is_no_constraint() {
        let filter: JobFilter = serde_json::from_value(serde_json::json!({
            "search": "",
            "location": "  ",
            "jobType": "",
            "isRemote": ""
        }))
        .unwrap();
        assert!(filter.search.is_none());
        assert!(filter.location.is_none());
        assert!(filter.job_type.is_none());
        assert!(filter.is_remote.is_none());
    }

    #[test]
    fn test_filter_parses_text_values() {
        let filter: JobFilter = serde_json::from_value(serde_json::json!({
            "page": "2",
            "limit": "5",
            "jobType": "part-time",
            "experienceLevel": "senior",
            "isRemote": "true"
        }))
        .unwrap();
        assert_eq!(filter.pagination(), Pagination::new(Some(2), Some(5)));
        assert_eq!(filter.job_type, Some(JobType::PartTime));
        assert_eq!(filter.experience_level, Some(ExperienceLevel::Senior));
        assert_eq!(filter.is_remote, Some(true));

        let bad = serde_json::from_value::<JobFilter>(serde_json::json!({"jobType": "gig"}));
        assert!(bad.is_err());
    }
}
