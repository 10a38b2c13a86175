//! User repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use jobboard_models::{Role, User, UserId};

use crate::error::{DbError, DbResult};

const USER_COLUMNS: &str =
    "id, name, email, role, is_active, email_verified, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    is_active: bool,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> DbResult<Self> {
        Ok(User {
            id: UserId::from(row.id),
            name: row.name,
            email: row.email,
            role: row.role.parse()?,
            is_active: row.is_active,
            email_verified: row.email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// A user together with their stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. Fails with [`DbError::Conflict`] if the email is taken.
    pub async fn create(&self, new_user: &NewUser) -> DbResult<User> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let user = User::try_from(row)?;
        info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn find_credentials_by_email(&self, email: &str) -> DbResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(UserCredentials {
                user: User::try_from(r.user)?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    pub async fn password_hash(&self, id: UserId) -> DbResult<Option<String>> {
        let hash: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(hash.map(|(h,)| h))
    }

    pub async fn update_password(&self, id: UserId, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("user {id}")));
        }
        info!(user_id = %id, "Updated password");
        Ok(())
    }

    /// Change name and/or email; `None` keeps the stored value.
    pub async fn update_account(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users
             SET name = COALESCE(?, name), email = COALESCE(?, email), updated_at = ?
             WHERE id = ?
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(Utc::now())
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| DbError::not_found(format!("user {id}")))
    }

    /// All users, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Oldest account allowed to post jobs, if any.
    pub async fn first_poster(&self) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role IN ('employer', 'admin') AND is_active = 1
             ORDER BY id ASC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
