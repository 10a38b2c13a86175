//! Applications and their review.

use tracing::{info, warn};
use validator::Validate;

use jobboard_db::{ApplicationRepository, JobRepository, NewApplication, StatusChange};
use jobboard_models::{
    Application, ApplicationId, ApplicationWithApplicant, ApplicationWithJob, ApplyRequest, JobId,
    UpdateStatusRequest,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::authorize::ensure_owner_or_admin;

#[derive(Clone)]
pub struct ApplicationService {
    jobs: JobRepository,
    applications: ApplicationRepository,
}

impl ApplicationService {
    pub fn new(jobs: JobRepository, applications: ApplicationRepository) -> Self {
        Self { jobs, applications }
    }

    /// Submit a pending application. The store's (job, user) uniqueness
    /// decides concurrent duplicates.
    pub async fn apply(&self, job_id: JobId, actor: &AuthUser, req: ApplyRequest) -> ApiResult<Application> {
        req.validate()?;

        match self.jobs.find(job_id).await? {
            Some(job) if job.is_active => {}
            _ => return Err(ApiError::not_found("Job not found or inactive")),
        }

        let new_app = NewApplication {
            job_id,
            user_id: actor.id,
            cover_letter: req.cover_letter,
            resume: req.resume,
        };

        match self.applications.create(&new_app).await {
            Ok(application) => {
                metrics::record_application_submitted();
                info!(application_id = %application.id, job_id = %job_id, user_id = %actor.id, "Application submitted");
                Ok(application)
            }
            Err(e) if e.is_conflict() => {
                Err(ApiError::conflict("You have already applied for this job"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_mine(&self, actor: &AuthUser) -> ApiResult<Vec<ApplicationWithJob>> {
        Ok(self.applications.list_for_user(actor.id).await?)
    }

    pub async fn list_for_job(&self, job_id: JobId, actor: &AuthUser) -> ApiResult<Vec<ApplicationWithApplicant>> {
        let job = self
            .jobs
            .find(job_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Job not found"))?;
        ensure_owner_or_admin(job.posted_by, actor, "Not authorized to view these applications")?;

        Ok(self.applications.list_for_job(job_id).await?)
    }

    /// Record a review decision by the job's poster or an admin.
    pub async fn update_status(
        &self,
        id: ApplicationId,
        actor: &AuthUser,
        req: UpdateStatusRequest,
    ) -> ApiResult<Application> {
        req.validate()?;

        let application = self
            .applications
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Application not found"))?;

        let Some(job) = self.jobs.find(application.job_id).await? else {
            warn!(application_id = %id, job_id = %application.job_id, "Application refers to a missing job");
            return Err(ApiError::not_found("Application not found"));
        };
        ensure_owner_or_admin(job.posted_by, actor, "Not authorized to update this application")?;

        let change = StatusChange {
            status: req.status,
            notes: req.notes,
            interview_date: req.interview_date,
            interview_location: req.interview_location,
            reviewed_by: actor.id,
        };
        let updated = self.applications.update_status(id, &change).await?;
        info!(application_id = %id, status = %updated.status, reviewer = %actor.id, "Application reviewed");
        Ok(updated)
    }
}
