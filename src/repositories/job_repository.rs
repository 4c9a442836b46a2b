use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{sql_state, Error, Result, FOREIGN_KEY_VIOLATION};
use crate::models::job::{Job, JobChanges, JobUpdate, NewJob};
use crate::models::status::JobStatus;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, owner_id: Uuid, job: &NewJob) -> Result<Job>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Job>>;

    /// Applies `changes` to the job only when it belongs to `owner_id`.
    /// The returned update carries the status the row had before the write.
    async fn update_owned(&self, id: Uuid, owner_id: Uuid, changes: &JobChanges) -> Result<Option<JobUpdate>>;

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Job>>;

    async fn set_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>>;

    /// `(status, count)` for every status present in the table.
    async fn status_counts(&self) -> Result<Vec<(String, i64)>>;
}

#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert(&self, owner_id: Uuid, job: &NewJob) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (user_id, company, position, status, date_applied, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, company, position, status, date_applied, notes, created_at
            "#,
        )
        .bind(owner_id)
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.status.as_str())
        .bind(job.date_applied)
        .bind(&job.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, user_id, company, position, status, date_applied, notes, created_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, user_id, company, position, status, date_applied, notes, created_at
            FROM jobs
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn update_owned(&self, id: Uuid, owner_id: Uuid, changes: &JobChanges) -> Result<Option<JobUpdate>> {
        // The CTE locks the row and reads its old status in the same statement as the write.
        let update = sqlx::query_as::<_, JobUpdate>(
            r#"
            WITH previous AS (
                SELECT id, status FROM jobs WHERE id = $1 AND user_id = $2 FOR UPDATE
            )
            UPDATE jobs j
            SET company = COALESCE($3, j.company),
                position = COALESCE($4, j.position),
                status = COALESCE($5, j.status),
                date_applied = COALESCE($6, j.date_applied),
                notes = COALESCE($7, j.notes)
            FROM previous
            WHERE j.id = previous.id
            RETURNING j.id, j.user_id, j.company, j.position, j.status, j.date_applied,
                      j.notes, j.created_at, previous.status AS previous_status
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&changes.company)
        .bind(&changes.position)
        .bind(changes.status.map(JobStatus::as_str))
        .bind(changes.date_applied)
        .bind(&changes.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(update)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            DELETE FROM jobs
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, company, position, status, date_applied, notes, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| match sql_state(&err).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => Error::InvalidInput(
                "Job has applications and cannot be deleted".to_string(),
            ),
            _ => Error::from(err),
        })
    }

    async fn set_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET status = $2
            WHERE id = $1
            RETURNING id, user_id, company, position, status, date_applied, notes, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn status_counts(&self) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) AS count FROM jobs GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
