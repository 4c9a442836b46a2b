use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::status::JobStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: String,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Result of an ownership-scoped update, with the status the row had before it.
#[derive(Debug, Clone, FromRow)]
pub struct JobUpdate {
    #[sqlx(flatten)]
    pub job: Job,
    pub previous_status: String,
}

impl JobUpdate {
    pub fn status_changed(&self) -> bool {
        self.job.status != self.previous_status
    }
}
