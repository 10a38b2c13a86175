//! Profile repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use jobboard_models::{
    JobType, Profile, ProfileId, ProfileWithUser, UpsertProfileRequest, UserId, UserSummary,
};

use crate::error::{DbError, DbResult};

const PROFILE_COLUMNS: &str = "id, user_id, headline, summary, experience, education, skills, \
     resume, phone, address, website, linkedin, github, portfolio, is_public, \
     years_of_experience, current_salary, expected_salary, preferred_job_type, \
     preferred_location, is_remote_preferred, created_at, updated_at";

const PROFILE_WITH_USER_SELECT: &str = "SELECT p.*, u.name AS user_name, u.email AS user_email \
     FROM profiles p JOIN users u ON u.id = p.user_id";

#[derive(Debug, FromRow)]
pub(crate) struct ProfileRow {
    id: i64,
    user_id: i64,
    headline: Option<String>,
    summary: Option<String>,
    experience: Option<String>,
    education: Option<String>,
    skills: Json<Vec<String>>,
    resume: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    website: Option<String>,
    linkedin: Option<String>,
    github: Option<String>,
    portfolio: Option<String>,
    is_public: bool,
    years_of_experience: Option<i32>,
    current_salary: Option<String>,
    expected_salary: Option<String>,
    preferred_job_type: Json<Vec<String>>,
    preferred_location: Json<Vec<String>>,
    is_remote_preferred: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: ProfileId::from(row.id),
            user_id: UserId::from(row.user_id),
            headline: row.headline,
            summary: row.summary,
            experience: row.experience,
            education: row.education,
            skills: row.skills.0,
            resume: row.resume,
            phone: row.phone,
            address: row.address,
            website: row.website,
            linkedin: row.linkedin,
            github: row.github,
            portfolio: row.portfolio,
            is_public: row.is_public,
            years_of_experience: row.years_of_experience,
            current_salary: row.current_salary,
            expected_salary: row.expected_salary,
            preferred_job_type: row.preferred_job_type.0,
            preferred_location: row.preferred_location.0,
            is_remote_preferred: row.is_remote_preferred,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProfileWithUserRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    user_name: String,
    user_email: String,
}

impl ProfileWithUserRow {
    fn into_view(self, include_email: bool) -> ProfileWithUser {
        let profile = Profile::from(self.profile);
        ProfileWithUser {
            user: UserSummary {
                id: profile.user_id,
                name: self.user_name,
                email: include_email.then_some(self.user_email),
            },
            profile,
        }
    }
}

/// Create-or-update payload with list inputs already normalized.
///
/// `None` leaves a field unchanged on update and falls back to the column
/// default on create.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Option<Vec<String>>,
    pub resume: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub is_public: Option<bool>,
    /// `Some(None)` clears the stored value.
    pub years_of_experience: Option<Option<i32>>,
    pub current_salary: Option<String>,
    pub expected_salary: Option<String>,
    pub preferred_job_type: Option<Vec<String>>,
    pub preferred_location: Option<Vec<String>>,
    pub is_remote_preferred: Option<bool>,
}

impl From<UpsertProfileRequest> for ProfileChanges {
    fn from(req: UpsertProfileRequest) -> Self {
        Self {
            headline: req.headline,
            summary: req.summary,
            experience: req.experience,
            education: req.education,
            skills: req.skills.and_then(|s| s.into_update()),
            resume: req.resume,
            phone: req.phone,
            address: req.address,
            website: req.website,
            linkedin: req.linkedin,
            github: req.github,
            portfolio: req.portfolio,
            is_public: req.is_public,
            years_of_experience: req.years_of_experience,
            current_salary: req.current_salary,
            expected_salary: req.expected_salary,
            preferred_job_type: req.preferred_job_type.and_then(|s| s.into_update()),
            preferred_location: req.preferred_location.and_then(|s| s.into_update()),
            is_remote_preferred: req.is_remote_preferred,
        }
    }
}

/// Outcome of [`ProfileRepository::upsert`].
#[derive(Debug, Clone)]
pub struct UpsertedProfile {
    pub profile: Profile,
    pub created: bool,
}

/// Repository for career profiles.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Own profile with the owner's id, name and email.
    pub async fn find_by_user(&self, user_id: UserId) -> DbResult<Option<ProfileWithUser>> {
        let row = sqlx::query_as::<_, ProfileWithUserRow>(&format!(
            "{PROFILE_WITH_USER_SELECT} WHERE p.user_id = ?"
        ))
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_view(true)))
    }

    /// Profile of `user_id` only if it is public. The owner's email is omitted.
    pub async fn find_public(&self, user_id: UserId) -> DbResult<Option<ProfileWithUser>> {
        let row = sqlx::query_as::<_, ProfileWithUserRow>(&format!(
            "{PROFILE_WITH_USER_SELECT} WHERE p.user_id = ? AND p.is_public = 1"
        ))
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_view(false)))
    }

    /// Profiles keyed by owner for the given users. Users without one are absent.
    pub async fn find_by_user_ids(&self, user_ids: &[UserId]) -> DbResult<HashMap<UserId, Profile>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(PROFILE_COLUMNS).push(" FROM profiles WHERE user_id IN (");
        let mut separated = qb.separated(", ");
        for id in user_ids {
            separated.push_bind(id.get());
        }
        separated.push_unseparated(")");

        let rows = qb.build_query_as::<ProfileRow>().fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(Profile::from)
            .map(|p| (p.user_id, p))
            .collect())
    }

    /// Create the profile of `user_id` if absent, otherwise apply `changes`.
    ///
    /// Both paths are single autocommit statements, so concurrent saves wait
    /// on the write lock instead of failing a lock upgrade.
    pub async fn upsert(&self, user_id: UserId, changes: &ProfileChanges) -> DbResult<UpsertedProfile> {
        let now = Utc::now();

        let (row, created) = match self.insert_if_absent(user_id, changes, now).await? {
            Some(row) => (row, true),
            None => (self.apply_changes(user_id, changes, now).await?, false),
        };

        let profile = Profile::from(row);
        info!(user_id = %user_id, profile_id = %profile.id, created, "Saved profile");
        Ok(UpsertedProfile { profile, created })
    }

    /// Insert a fresh profile. Returns `None` when the user already has one.
    async fn insert_if_absent(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
        now: DateTime<Utc>,
    ) -> DbResult<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "INSERT INTO profiles (user_id, headline, summary, experience, education,
                skills, resume, phone, address, website, linkedin, github, portfolio,
                is_public, years_of_experience, current_salary, expected_salary,
                preferred_job_type, preferred_location, is_remote_preferred,
                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id.get())
        .bind(&changes.headline)
        .bind(&changes.summary)
        .bind(&changes.experience)
        .bind(&changes.education)
        .bind(Json(changes.skills.clone().unwrap_or_default()))
        .bind(&changes.resume)
        .bind(&changes.phone)
        .bind(&changes.address)
        .bind(&changes.website)
        .bind(&changes.linkedin)
        .bind(&changes.github)
        .bind(&changes.portfolio)
        .bind(changes.is_public.unwrap_or(true))
        .bind(changes.years_of_experience.flatten())
        .bind(&changes.current_salary)
        .bind(&changes.expected_salary)
        .bind(Json(
            changes
                .preferred_job_type
                .clone()
                .unwrap_or_else(|| vec![JobType::FullTime.as_str().to_string()]),
        ))
        .bind(Json(changes.preferred_location.clone().unwrap_or_default()))
        .bind(changes.is_remote_preferred.unwrap_or(false))
        .bind(now)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn apply_changes(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
        now: DateTime<Utc>,
    ) -> DbResult<ProfileRow> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE profiles SET updated_at = ");
        qb.push_bind(now);
        push_text(&mut qb, "headline", &changes.headline);
        push_text(&mut qb, "summary", &changes.summary);
        push_text(&mut qb, "experience", &changes.experience);
        push_text(&mut qb, "education", &changes.education);
        push_list(&mut qb, "skills", &changes.skills);
        push_text(&mut qb, "resume", &changes.resume);
        push_text(&mut qb, "phone", &changes.phone);
        push_text(&mut qb, "address", &changes.address);
        push_text(&mut qb, "website", &changes.website);
        push_text(&mut qb, "linkedin", &changes.linkedin);
        push_text(&mut qb, "github", &changes.github);
        push_text(&mut qb, "portfolio", &changes.portfolio);
        if let Some(is_public) = changes.is_public {
            qb.push(", is_public = ").push_bind(is_public);
        }
        if let Some(years) = changes.years_of_experience {
            qb.push(", years_of_experience = ").push_bind(years);
        }
        push_text(&mut qb, "current_salary", &changes.current_salary);
        push_text(&mut qb, "expected_salary", &changes.expected_salary);
        push_list(&mut qb, "preferred_job_type", &changes.preferred_job_type);
        push_list(&mut qb, "preferred_location", &changes.preferred_location);
        if let Some(remote) = changes.is_remote_preferred {
            qb.push(", is_remote_preferred = ").push_bind(remote);
        }
        qb.push(" WHERE user_id = ").push_bind(user_id.get());
        qb.push(" RETURNING ").push(PROFILE_COLUMNS);

        qb.build_query_as::<ProfileRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(format!("profile of user {user_id}")))
    }
}

fn push_text(qb: &mut QueryBuilder<'_, Sqlite>, column: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value.clone());
    }
}

fn push_list(qb: &mut QueryBuilder<'_, Sqlite>, column: &'static str, value: &Option<Vec<String>>) {
    if let Some(items) = value {
        qb.push(", ").push(column).push(" = ").push_bind(Json(items.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::NewUser;
    use crate::Database;
    use jobboard_models::{ListInput, Role};

    async fn setup() -> (Database, UserId) {
        let db = Database::in_memory().await.unwrap();
        let user = db
            .users()
            .create(&NewUser {
                name: "Casey Candidate".into(),
                email: "casey@example.com".into(),
                password_hash: "hash".into(),
                role: Role::Jobseeker,
            })
            .await
            .unwrap();
        (db, user.id)
    }

    async fn count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_uses_defaults() {
        let (db, user) = setup().await;
        let profiles = db.profiles();

        let saved = profiles
            .upsert(
                user,
                &ProfileChanges {
                    headline: Some("Backend developer".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(saved.created);
        assert!(saved.profile.is_public);
        assert_eq!(saved.profile.preferred_job_type, vec!["full-time"]);
        assert!(saved.profile.skills.is_empty());
        assert_eq!(saved.profile.years_of_experience, None);

        let own = profiles.find_by_user(user).await.unwrap().unwrap();
        assert_eq!(own.user.name, "Casey Candidate");
        assert_eq!(own.user.email.as_deref(), Some("casey@example.com"));
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields_and_clears_years() {
        let (db, user) = setup().await;
        let profiles = db.profiles();

        profiles
            .upsert(
                user,
                &ProfileChanges::from(UpsertProfileRequest {
                    headline: Some("First".into()),
                    skills: Some(ListInput::from("Rust, SQL")),
                    years_of_experience: Some(Some(4)),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        let saved = profiles
            .upsert(
                user,
                &ProfileChanges::from(UpsertProfileRequest {
                    summary: Some("Ships things".into()),
                    skills: Some(ListInput::from("")),
                    years_of_experience: Some(None),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert!(!saved.created);
        assert_eq!(saved.profile.headline.as_deref(), Some("First"));
        assert_eq!(saved.profile.summary.as_deref(), Some("Ships things"));
        assert_eq!(saved.profile.skills, vec!["Rust", "SQL"]);
        assert_eq!(saved.profile.years_of_experience, None);
        assert_eq!(count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_private_profile_is_not_public() {
        let (db, user) = setup().await;
        let profiles = db.profiles();
        assert!(profiles.find_public(user).await.unwrap().is_none());

        profiles
            .upsert(
                user,
                &ProfileChanges {
                    is_public: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(profiles.find_public(user).await.unwrap().is_none());
        assert!(profiles.find_by_user(user).await.unwrap().is_some());

        profiles
            .upsert(
                user,
                &ProfileChanges {
                    is_public: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let public = profiles.find_public(user).await.unwrap().unwrap();
        assert!(public.user.email.is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_ids() {
        let (db, user) = setup().await;
        let profiles = db.profiles();
        profiles.upsert(user, &ProfileChanges::default()).await.unwrap();

        let found = profiles
            .find_by_user_ids(&[user, UserId::from(404)])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&user));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::temp_file(&dir).await;

        let mut users = Vec::new();
        for i in 0..12 {
            let user = db
                .users()
                .create(&NewUser {
                    name: format!("Candidate {i}"),
                    email: format!("candidate{i}@example.com"),
                    password_hash: "hash".into(),
                    role: Role::Jobseeker,
                })
                .await
                .unwrap();
            users.push(user.id);
        }

        let mut tasks = Vec::new();
        for &user in &users {
            for n in 0..4 {
                let profiles = db.profiles();
                tasks.push(tokio::spawn(async move {
                    profiles
                        .upsert(
                            user,
                            &ProfileChanges {
                                headline: Some(format!("Headline {n}")),
                                ..Default::default()
                            },
                        )
                        .await
                }));
            }
        }

        let mut created = 0;
        for task in tasks {
            let saved = task.await.unwrap().unwrap();
            if saved.created {
                created += 1;
            }
        }
        assert_eq!(created, users.len());
        assert_eq!(count(&db).await, users.len() as i64);
        db.close().await;
    }

    #[tokio::test]
    async fn test_update_of_missing_profile_is_not_found() {
        let (db, user) = setup().await;
        let err = db
            .profiles()
            .apply_changes(user, &ProfileChanges::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
