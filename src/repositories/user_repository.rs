use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{sql_state, Error, Result, UNIQUE_VIOLATION};
use crate::models::user::{NewUser, ProfileChanges, ProfileDocuments, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `InvalidInput` when the email is already registered.
    async fn create(&self, user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Writes the present fields of `documents`; absent fields keep their
    /// stored value. Returns the resulting references, or `None` for an
    /// unknown user.
    async fn merge_documents(&self, id: Uuid, documents: &ProfileDocuments) -> Result<Option<ProfileDocuments>>;

    /// Same merge semantics as `merge_documents`, across all profile fields.
    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>>;

    /// Marks the owner of `token` verified and consumes the token.
    async fn verify_email(&self, token: &str) -> Result<bool>;

    async fn set_reset_token(&self, email: &str, token: &str) -> Result<bool>;

    /// Replaces the password of the owner of `token` and consumes the token.
    async fn reset_password(&self, token: &str, password_hash: &str) -> Result<bool>;
}

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, bio, location, profile_picture, skills, \
     education_level, education_grade, age, experience, cv_url, verification_token, reset_token, \
     is_verified, is_admin, created_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, verification_token, is_verified, is_admin)
             VALUES ($1, $2, $3, $4, FALSE, FALSE)
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.verification_token)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match sql_state(&err).as_deref() {
                Some(UNIQUE_VIOLATION) => Error::InvalidInput("User already exists".to_string()),
                _ => Error::from(err),
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn merge_documents(&self, id: Uuid, documents: &ProfileDocuments) -> Result<Option<ProfileDocuments>> {
        let merged = sqlx::query_as::<_, ProfileDocuments>(
            r#"
            UPDATE users
            SET profile_picture = COALESCE($2, profile_picture),
                cv_url = COALESCE($3, cv_url)
            WHERE id = $1
            RETURNING profile_picture, cv_url
            "#,
        )
        .bind(id)
        .bind(&documents.profile_picture)
        .bind(&documents.cv_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(merged)
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>> {
        let query = format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 phone = COALESCE($3, phone),
                 bio = COALESCE($4, bio),
                 location = COALESCE($5, location),
                 education_level = COALESCE($6, education_level),
                 education_grade = COALESCE($7, education_grade),
                 age = COALESCE($8, age),
                 experience = COALESCE($9, experience),
                 profile_picture = COALESCE($10, profile_picture),
                 cv_url = COALESCE($11, cv_url),
                 skills = COALESCE($12, skills)
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.phone)
            .bind(&changes.bio)
            .bind(&changes.location)
            .bind(&changes.education_level)
            .bind(&changes.education_grade)
            .bind(changes.age)
            .bind(&changes.experience)
            .bind(&changes.profile_picture)
            .bind(&changes.cv_url)
            .bind(&changes.skills)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn verify_email(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, verification_token = NULL WHERE verification_token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_reset_token(&self, email: &str, token: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET reset_token = $1 WHERE email = $2")
            .bind(token)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reset_password(&self, token: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, reset_token = NULL WHERE reset_token = $2",
        )
        .bind(password_hash)
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
