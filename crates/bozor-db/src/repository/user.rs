//! # User Repository
//!
//! ## Two Validation Paths
//! ```text
//! register(NewUser)            update(id, UserProfile)
//!   username, email              username, email, phone_number (required)
//!   lowercase + trim             first / last / patronymic (title case)
//!   no phone yet                 runs on every persist after registration
//! ```
//!
//! Duplicate usernames, emails and phone numbers are rejected by the
//! table's UNIQUE constraints and returned as [`DbError::UniqueViolation`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bozor_core::normalize::{normalize_required, NormalizeOptions};
use bozor_core::uploads::avatar_path;
use bozor_core::{NewUser, Role, User, UserProfile, Validate};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account from credentials. The password is already hashed.
    pub async fn register(&self, user: NewUser) -> DbResult<User> {
        let user = user.validate()?;
        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Role::User)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(id, username = %user.username, "User registered");

        self.fetch(id).await
    }

    /// Replaces the profile fields of an existing user.
    pub async fn update(&self, id: i64, profile: UserProfile) -> DbResult<User> {
        let profile = profile.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = ?1,
                email = ?2,
                phone_number = ?3,
                first_name = ?4,
                last_name = ?5,
                patronymic = ?6,
                updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&profile.username)
        .bind(&profile.email)
        .bind(&profile.phone_number)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.patronymic)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        debug!(id, "User profile updated");
        self.fetch(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Looks a user up by username, ignoring case and surrounding whitespace.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let username = match normalize_required("username", username, NormalizeOptions::new().unique()) {
            Ok(username) => username,
            Err(_) => return Ok(None),
        };

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1")
            .bind(&username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Records the stored avatar path for an uploaded file name.
    pub async fn set_avatar(&self, id: i64, filename: &str) -> DbResult<User> {
        let path = avatar_path(id, filename)?;

        let result = sqlx::query("UPDATE users SET avatar = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&path)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.fetch(id).await
    }

    async fn fetch(&self, id: i64) -> DbResult<User> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }
}
