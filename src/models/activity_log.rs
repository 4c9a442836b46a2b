use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ACTION_JOB_ADDED: &str = "job_added";
pub const ACTION_STATUS_UPDATED: &str = "status_updated";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub job_id: Uuid,
    pub action: String,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub job_id: Uuid,
    pub action: &'static str,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
}

impl NewActivity {
    pub fn job_added(job_id: Uuid) -> Self {
        Self {
            job_id,
            action: ACTION_JOB_ADDED,
            old_status: None,
            new_status: None,
        }
    }

    pub fn status_updated(job_id: Uuid, old_status: &str, new_status: &str) -> Self {
        Self {
            job_id,
            action: ACTION_STATUS_UPDATED,
            old_status: Some(old_status.to_string()),
            new_status: Some(new_status.to_string()),
        }
    }
}
