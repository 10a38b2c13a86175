//! Job postings.

use tracing::info;
use validator::Validate;

use jobboard_db::{JobChanges, JobRepository, NewJob};
use jobboard_models::{CreateJobRequest, Job, JobFilter, JobId, JobPage, JobWithPoster, UpdateJobRequest};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::authorize::ensure_owner_or_admin;

#[derive(Clone)]
pub struct JobService {
    jobs: JobRepository,
}

impl JobService {
    pub fn new(jobs: JobRepository) -> Self {
        Self { jobs }
    }

    /// Active jobs matching every supplied filter, newest first.
    pub async fn list(&self, filter: &JobFilter) -> ApiResult<JobPage> {
        let pagination = filter.pagination();
        let (jobs, total) = self.jobs.list_active(filter).await?;

        Ok(JobPage {
            jobs,
            total,
            current_page: pagination.page,
            total_pages: pagination.total_pages(total),
        })
    }

    /// Any job by id, active or not.
    pub async fn get(&self, id: JobId) -> ApiResult<JobWithPoster> {
        self.jobs
            .find_with_poster(id)
            .await?
            .ok_or_else(job_not_found)
    }

    pub async fn create(&self, actor: &AuthUser, req: CreateJobRequest) -> ApiResult<Job> {
        req.validate()?;

        let job = self.jobs.create(&NewJob::from_request(req, actor.id)).await?;
        metrics::record_job_created();
        info!(job_id = %job.id, posted_by = %actor.id, "Job created");
        Ok(job)
    }

    pub async fn update(&self, id: JobId, actor: &AuthUser, req: UpdateJobRequest) -> ApiResult<Job> {
        req.validate()?;

        let job = self.jobs.find(id).await?.ok_or_else(job_not_found)?;
        ensure_owner_or_admin(job.posted_by, actor, "Not authorized to update this job")?;

        Ok(self.jobs.update(id, &JobChanges::from(req)).await?)
    }

    pub async fn delete(&self, id: JobId, actor: &AuthUser) -> ApiResult<()> {
        let job = self.jobs.find(id).await?.ok_or_else(job_not_found)?;
        ensure_owner_or_admin(job.posted_by, actor, "Not authorized to delete this job")?;

        if !self.jobs.delete(id).await? {
            return Err(job_not_found());
        }
        info!(job_id = %id, actor = %actor.id, "Job deleted");
        Ok(())
    }

    /// Every job the caller posted, including inactive ones.
    pub async fn list_mine(&self, actor: &AuthUser) -> ApiResult<Vec<Job>> {
        Ok(self.jobs.list_by_poster(actor.id).await?)
    }
}

fn job_not_found() -> ApiError {
    ApiError::not_found("Job not found")
}
