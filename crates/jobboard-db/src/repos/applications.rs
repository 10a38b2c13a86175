//! Application repository.
//!
//! The one-application-per-(job, user) rule is the `UNIQUE (job_id, user_id)`
//! constraint; [`ApplicationRepository::create`] surfaces a violation as
//! [`DbError::Conflict`], so concurrent duplicate applies cannot both succeed.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{info, warn};

use jobboard_models::{
    ApplicantView, Application, ApplicationId, ApplicationStatus, ApplicationWithApplicant,
    ApplicationWithJob, JobId, UserId, UserSummary,
};

use crate::error::{DbError, DbResult};
use crate::repos::{JobRepository, ProfileRepository};

const APPLICATION_COLUMNS: &str = "id, job_id, user_id, status, cover_letter, resume, \
     applied_at, reviewed_at, reviewed_by, notes, interview_date, interview_location, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct ApplicationRow {
    id: i64,
    job_id: i64,
    user_id: i64,
    status: String,
    cover_letter: Option<String>,
    resume: Option<String>,
    applied_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<i64>,
    notes: Option<String>,
    interview_date: Option<DateTime<Utc>>,
    interview_location: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = DbError;

    fn try_from(row: ApplicationRow) -> DbResult<Self> {
        Ok(Application {
            id: ApplicationId::from(row.id),
            job_id: JobId::from(row.job_id),
            user_id: UserId::from(row.user_id),
            status: row.status.parse()?,
            cover_letter: row.cover_letter,
            resume: row.resume,
            applied_at: row.applied_at,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by.map(UserId::from),
            notes: row.notes,
            interview_date: row.interview_date,
            interview_location: row.interview_location,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ApplicantRow {
    #[sqlx(flatten)]
    application: ApplicationRow,
    applicant_name: String,
    applicant_email: String,
}

/// Insert payload for a new application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: JobId,
    pub user_id: UserId,
    pub cover_letter: Option<String>,
    pub resume: Option<String>,
}

/// A review decision. Notes and interview fields are kept when `None`.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_location: Option<String>,
    pub reviewed_by: UserId,
}

/// Repository for job applications.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: SqlitePool,
}

impl ApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pending application.
    ///
    /// Fails with [`DbError::Conflict`] if the user already applied to the job.
    pub async fn create(&self, new_app: &NewApplication) -> DbResult<Application> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, ApplicationRow>(&format!(
            "INSERT INTO applications (job_id, user_id, status, cover_letter, resume, applied_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(new_app.job_id.get())
        .bind(new_app.user_id.get())
        .bind(ApplicationStatus::Pending.as_str())
        .bind(&new_app.cover_letter)
        .bind(&new_app.resume)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from);

        let row = match result {
            Ok(row) => row,
            Err(err) => {
                if err.is_conflict() {
                    warn!(job_id = %new_app.job_id, user_id = %new_app.user_id, "Duplicate application rejected");
                }
                return Err(err);
            }
        };

        let application = Application::try_from(row)?;
        info!(
            application_id = %application.id,
            job_id = %application.job_id,
            user_id = %application.user_id,
            "Created application"
        );
        Ok(application)
    }

    pub async fn find(&self, id: ApplicationId) -> DbResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    /// Applications submitted by `user_id`, newest first, each with its job
    /// and the job's poster (id and name).
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<ApplicationWithJob>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE user_id = ?
             ORDER BY applied_at DESC, id DESC"
        ))
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        let applications = rows
            .into_iter()
            .map(Application::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        let job_ids: Vec<JobId> = applications.iter().map(|a| a.job_id).collect();
        let mut jobs = JobRepository::new(self.pool.clone())
            .find_with_poster_by_ids(&job_ids)
            .await?;

        // (job, user) is unique, so each job belongs to exactly one application here.
        Ok(applications
            .into_iter()
            .filter_map(|application| {
                let mut job = jobs.remove(&application.job_id)?;
                job.poster.email = None;
                Some(ApplicationWithJob { application, job })
            })
            .collect())
    }

    /// Applications to `job_id`, newest first, each with the applicant's
    /// identity and profile.
    pub async fn list_for_job(&self, job_id: JobId) -> DbResult<Vec<ApplicationWithApplicant>> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            "SELECT a.*, u.name AS applicant_name, u.email AS applicant_email
             FROM applications a JOIN users u ON u.id = a.user_id
             WHERE a.job_id = ?
             ORDER BY a.applied_at DESC, a.id DESC",
        )
        .bind(job_id.get())
        .fetch_all(&self.pool)
        .await?;

        let user_ids: Vec<UserId> = rows.iter().map(|r| UserId::from(r.application.user_id)).collect();
        let mut profiles = ProfileRepository::new(self.pool.clone())
            .find_by_user_ids(&user_ids)
            .await?;

        rows.into_iter()
            .map(|row| {
                let application = Application::try_from(row.application)?;
                let applicant = ApplicantView {
                    user: UserSummary {
                        id: application.user_id,
                        name: row.applicant_name,
                        email: Some(row.applicant_email),
                    },
                    profile: profiles.remove(&application.user_id),
                };
                Ok(ApplicationWithApplicant {
                    application,
                    applicant,
                })
            })
            .collect()
    }

    /// Record a review decision, stamping reviewer and review time.
    pub async fn update_status(
        &self,
        id: ApplicationId,
        change: &StatusChange,
    ) -> DbResult<Application> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE applications
             SET status = ?,
                 notes = COALESCE(?, notes),
                 interview_date = COALESCE(?, interview_date),
                 interview_location = COALESCE(?, interview_location),
                 reviewed_by = ?,
                 reviewed_at = ?,
                 updated_at = ?
             WHERE id = ?
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(change.status.as_str())
        .bind(&change.notes)
        .bind(change.interview_date)
        .bind(&change.interview_location)
        .bind(change.reviewed_by.get())
        .bind(now)
        .bind(now)
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(format!("application {id}")))?;

        info!(application_id = %id, status = %change.status, reviewer = %change.reviewed_by, "Updated application status");
        Application::try_from(row)
    }
}
