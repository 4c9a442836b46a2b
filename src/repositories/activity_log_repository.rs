use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::activity_log::{ActivityLog, NewActivity};

/// Append-only job history.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn record(&self, entry: &NewActivity) -> Result<ActivityLog>;
}

#[derive(Clone)]
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    async fn record(&self, entry: &NewActivity) -> Result<ActivityLog> {
        let row = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (job_id, action, old_status, new_status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, job_id, action, old_status, new_status, created_at
            "#,
        )
        .bind(entry.job_id)
        .bind(entry.action)
        .bind(&entry.old_status)
        .bind(&entry.new_status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
