use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{sql_state, Error, Result, UNIQUE_VIOLATION};
use crate::models::application::{Application, ApplicationFilter, ApplicationOverview, NewApplication};
use crate::models::status::ApplicationStatus;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>>;

    async fn find_by_user_and_job(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<Application>>;

    /// Fails with `DuplicateApplication` if the (user, job) pair already has one.
    async fn insert(&self, application: &NewApplication) -> Result<Application>;

    async fn update_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Option<Application>>;

    /// One set-based update; ids with no row are simply absent from the result.
    async fn update_status_many(&self, ids: &[Uuid], status: ApplicationStatus) -> Result<Vec<Application>>;

    async fn status_counts(&self) -> Result<Vec<(String, i64)>>;

    async fn list_overview(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationOverview>>;

    /// CV reference of the applicant behind an application.
    async fn applicant_cv_url(&self, id: Uuid) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            "SELECT id, user_id, job_id, status, cover_letter, applied_at FROM applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn find_by_user_and_job(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, user_id, job_id, status, cover_letter, applied_at
            FROM applications
            WHERE user_id = $1 AND job_id = $2
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn insert(&self, application: &NewApplication) -> Result<Application> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (user_id, job_id, cover_letter, status, applied_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, user_id, job_id, status, cover_letter, applied_at
            "#,
        )
        .bind(application.user_id)
        .bind(application.job_id)
        .bind(&application.cover_letter)
        .bind(application.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match sql_state(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => Error::DuplicateApplication,
            _ => Error::from(err),
        })
    }

    async fn update_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications SET status = $1
            WHERE id = $2
            RETURNING id, user_id, job_id, status, cover_letter, applied_at
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn update_status_many(&self, ids: &[Uuid], status: ApplicationStatus) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications SET status = $1
            WHERE id = ANY($2)
            RETURNING id, user_id, job_id, status, cover_letter, applied_at
            "#,
        )
        .bind(status.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn status_counts(&self) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) AS count FROM applications GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_overview(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationOverview>> {
        let rows = sqlx::query_as::<_, ApplicationOverview>(
            r#"
            SELECT a.id, a.status, a.applied_at, a.cover_letter,
                   u.name, u.email, u.age, u.education_grade AS degree_class,
                   u.profile_picture, u.cv_url,
                   j.company, j.position, a.user_id, a.job_id
            FROM applications a
            JOIN users u ON a.user_id = u.id
            JOIN jobs j ON a.job_id = j.id
            WHERE ($1::text IS NULL OR a.status = $1)
              AND ($2::int IS NULL OR u.age >= $2)
              AND ($3::int IS NULL OR u.age <= $3)
              AND ($4::text IS NULL OR u.education_grade = $4)
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(filter.status.map(ApplicationStatus::as_str))
        .bind(filter.age_min)
        .bind(filter.age_max)
        .bind(&filter.degree_class)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn applicant_cv_url(&self, id: Uuid) -> Result<Option<String>> {
        let cv_url = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT u.cv_url
            FROM users u
            JOIN applications a ON u.id = a.user_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cv_url.flatten())
    }
}
