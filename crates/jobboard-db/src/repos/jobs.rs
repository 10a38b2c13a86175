//! Job repository, including the filtered public listing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use jobboard_models::{
    CreateJobRequest, ExperienceLevel, Job, JobFilter, JobId, JobType, JobWithPoster, Pagination,
    UpdateJobRequest, UserId, UserSummary,
};

use crate::error::{DbError, DbResult};

const JOB_COLUMNS: &str = "id, title, description, requirements, location, company, salary, \
     job_type, experience_level, is_remote, is_active, posted_by, application_deadline, \
     benefits, skills, created_at, updated_at";

const JOB_WITH_POSTER_SELECT: &str = "SELECT j.*, u.name AS poster_name, u.email AS poster_email \
     FROM jobs j JOIN users u ON u.id = j.posted_by";

#[derive(Debug, FromRow)]
pub(crate) struct JobRow {
    id: i64,
    title: String,
    description: String,
    requirements: String,
    location: String,
    company: String,
    salary: String,
    job_type: String,
    experience_level: String,
    is_remote: bool,
    is_active: bool,
    posted_by: i64,
    application_deadline: Option<DateTime<Utc>>,
    benefits: Option<String>,
    skills: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = DbError;

    fn try_from(row: JobRow) -> DbResult<Self> {
        Ok(Job {
            id: JobId::from(row.id),
            title: row.title,
            description: row.description,
            requirements: row.requirements,
            location: row.location,
            company: row.company,
            salary: row.salary,
            job_type: row.job_type.parse()?,
            experience_level: row.experience_level.parse()?,
            is_remote: row.is_remote,
            is_active: row.is_active,
            posted_by: UserId::from(row.posted_by),
            application_deadline: row.application_deadline,
            benefits: row.benefits,
            skills: row.skills.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct JobWithPosterRow {
    #[sqlx(flatten)]
    job: JobRow,
    poster_name: String,
    poster_email: String,
}

impl TryFrom<JobWithPosterRow> for JobWithPoster {
    type Error = DbError;

    fn try_from(row: JobWithPosterRow) -> DbResult<Self> {
        let job = Job::try_from(row.job)?;
        Ok(JobWithPoster {
            poster: UserSummary {
                id: job.posted_by,
                name: row.poster_name,
                email: Some(row.poster_email),
            },
            job,
        })
    }
}

/// Insert payload with every default resolved.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub company: String,
    pub salary: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub is_remote: bool,
    pub application_deadline: Option<DateTime<Utc>>,
    pub benefits: Option<String>,
    pub skills: Vec<String>,
    pub posted_by: UserId,
}

impl NewJob {
    pub fn from_request(req: CreateJobRequest, posted_by: UserId) -> Self {
        Self {
            title: req.title,
            description: req.description,
            requirements: req.requirements,
            location: req.location,
            company: req.company,
            salary: req.salary,
            job_type: req.job_type.unwrap_or_default(),
            experience_level: req.experience_level.unwrap_or_default(),
            is_remote: req.is_remote.unwrap_or(false),
            application_deadline: req.application_deadline,
            benefits: req.benefits,
            skills: req.skills.map(|s| s.into_list()).unwrap_or_default(),
            posted_by,
        }
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub is_remote: Option<bool>,
    pub is_active: Option<bool>,
    /// `Some(None)` clears the stored value.
    pub application_deadline: Option<Option<DateTime<Utc>>>,
    /// `Some(None)` clears the stored value.
    pub benefits: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
}

impl From<UpdateJobRequest> for JobChanges {
    fn from(req: UpdateJobRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            requirements: req.requirements,
            location: req.location,
            company: req.company,
            salary: req.salary,
            job_type: req.job_type,
            experience_level: req.experience_level,
            is_remote: req.is_remote,
            is_active: req.is_active,
            application_deadline: req.application_deadline,
            benefits: req.benefits,
            skills: req.skills.and_then(|s| s.into_update()),
        }
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE`.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Append the `WHERE` clause for the public listing.
fn push_listing_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &JobFilter) {
    qb.push(" WHERE j.is_active = 1");

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (j.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR j.description LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR j.requirements LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(location) = &filter.location {
        qb.push(" AND j.location LIKE ")
            .push_bind(like_pattern(location))
            .push(" ESCAPE '\\'");
    }
    if let Some(job_type) = filter.job_type {
        qb.push(" AND j.job_type = ").push_bind(job_type.as_str());
    }
    if let Some(level) = filter.experience_level {
        qb.push(" AND j.experience_level = ").push_bind(level.as_str());
    }
    if let Some(is_remote) = filter.is_remote {
        qb.push(" AND j.is_remote = ").push_bind(is_remote);
    }
    if let Some(company) = &filter.company {
        qb.push(" AND j.company LIKE ")
            .push_bind(like_pattern(company))
            .push(" ESCAPE '\\'");
    }
}

/// Repository for job postings.
#[derive(Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

impl JobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_job: &NewJob) -> DbResult<Job> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "INSERT INTO jobs (title, description, requirements, location, company, salary,
                job_type, experience_level, is_remote, is_active, posted_by,
                application_deadline, benefits, skills, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?, ?, ?)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(&new_job.title)
        .bind(&new_job.description)
        .bind(&new_job.requirements)
        .bind(&new_job.location)
        .bind(&new_job.company)
        .bind(&new_job.salary)
        .bind(new_job.job_type.as_str())
        .bind(new_job.experience_level.as_str())
        .bind(new_job.is_remote)
        .bind(new_job.posted_by.get())
        .bind(new_job.application_deadline)
        .bind(&new_job.benefits)
        .bind(Json(&new_job.skills))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let job = Job::try_from(row)?;
        info!(job_id = %job.id, posted_by = %job.posted_by, "Created job");
        Ok(job)
    }

    /// Job by id regardless of its active flag.
    pub async fn find(&self, id: JobId) -> DbResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Job::try_from).transpose()
    }

    pub async fn find_with_poster(&self, id: JobId) -> DbResult<Option<JobWithPoster>> {
        let row = sqlx::query_as::<_, JobWithPosterRow>(&format!(
            "{JOB_WITH_POSTER_SELECT} WHERE j.id = ?"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(JobWithPoster::try_from).transpose()
    }

    /// Jobs keyed by id, each joined with its poster. Unknown ids are skipped.
    pub async fn find_with_poster_by_ids(
        &self,
        ids: &[JobId],
    ) -> DbResult<HashMap<JobId, JobWithPoster>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(JOB_WITH_POSTER_SELECT);
        qb.push(" WHERE j.id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.get());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build_query_as::<JobWithPosterRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| JobWithPoster::try_from(row).map(|j| (j.job.id, j)))
            .collect()
    }

    /// One page of active jobs matching `filter`, newest first, plus the
    /// total number of matches.
    pub async fn list_active(&self, filter: &JobFilter) -> DbResult<(Vec<JobWithPoster>, u64)> {
        let page = filter.pagination();

        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs j");
        push_listing_filters(&mut count_qb, filter);
        let total = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new(JOB_WITH_POSTER_SELECT);
        push_listing_filters(&mut qb, filter);
        push_page(&mut qb, &page);

        let rows = qb
            .build_query_as::<JobWithPosterRow>()
            .fetch_all(&self.pool)
            .await?;
        debug!(total, returned = rows.len(), page = page.page, "Listed active jobs");

        let jobs = rows
            .into_iter()
            .map(JobWithPoster::try_from)
            .collect::<DbResult<Vec<_>>>()?;
        Ok((jobs, u64::try_from(total).unwrap_or_default()))
    }

    /// Every job posted by `user_id`, active or not, newest first.
    pub async fn list_by_poster(&self, user_id: UserId) -> DbResult<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE posted_by = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Job::try_from).collect()
    }

    /// Apply `changes` in a single statement.
    pub async fn update(&self, id: JobId, changes: &JobChanges) -> DbResult<Job> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE jobs SET updated_at = ");
        qb.push_bind(Utc::now());

        if let Some(title) = &changes.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        if let Some(requirements) = &changes.requirements {
            qb.push(", requirements = ").push_bind(requirements.clone());
        }
        if let Some(location) = &changes.location {
            qb.push(", location = ").push_bind(location.clone());
        }
        if let Some(company) = &changes.company {
            qb.push(", company = ").push_bind(company.clone());
        }
        if let Some(salary) = &changes.salary {
            qb.push(", salary = ").push_bind(salary.clone());
        }
        if let Some(job_type) = changes.job_type {
            qb.push(", job_type = ").push_bind(job_type.as_str());
        }
        if let Some(level) = changes.experience_level {
            qb.push(", experience_level = ").push_bind(level.as_str());
        }
        if let Some(is_remote) = changes.is_remote {
            qb.push(", is_remote = ").push_bind(is_remote);
        }
        if let Some(is_active) = changes.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }
        if let Some(deadline) = changes.application_deadline {
            qb.push(", application_deadline = ").push_bind(deadline);
        }
        if let Some(benefits) = &changes.benefits {
            qb.push(", benefits = ").push_bind(benefits.clone());
        }
        if let Some(skills) = &changes.skills {
            qb.push(", skills = ").push_bind(Json(skills.clone()));
        }

        qb.push(" WHERE id = ").push_bind(id.get());
        qb.push(" RETURNING ").push(JOB_COLUMNS);

        let row = qb
            .build_query_as::<JobRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(format!("job {id}")))?;

        info!(job_id = %id, "Updated job");
        Job::try_from(row)
    }

    /// Hard delete. Returns false if nothing was removed.
    pub async fn delete(&self, id: JobId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(job_id = %id, "Deleted job");
        }
        Ok(deleted)
    }
}

fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, page: &Pagination) {
    qb.push(" ORDER BY j.created_at DESC, j.id DESC LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
}
