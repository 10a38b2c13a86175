//! Shared data models for the job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Users, roles and authentication payloads
//! - Jobs, job filters and paginated listings
//! - Applications and their review status
//! - Candidate profiles
//! - Composed read-side views (job + poster, application + applicant, ...)

pub mod application;
pub mod auth;
pub mod error;
pub mod ids;
pub mod job;
pub mod list_input;
pub mod profile;
pub mod serde_ext;
pub mod user;

// Re-export common types
pub use application::{
    ApplicantView, Application, ApplicationMutationResponse, ApplicationStatus,
    ApplicationWithApplicant, ApplicationWithJob, ApplyRequest, UpdateStatusRequest,
};
pub use auth::{
    AccountResponse, AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, UpdateAccountRequest, UserResponse, UsersResponse,
};
pub use error::ParseEnumError;
pub use ids::{ApplicationId, JobId, ProfileId, UserId};
pub use job::{
    CreateJobRequest, ExperienceLevel, Job, JobFilter, JobMutationResponse, JobPage, JobType,
    JobWithPoster, Pagination, UpdateJobRequest,
};
pub use list_input::{normalize_list, ListInput};
pub use profile::{
    Profile, ProfileMutationResponse, ProfileResponse, ProfileWithUser, UpsertProfileRequest,
};
pub use user::{Role, User, UserSummary};
