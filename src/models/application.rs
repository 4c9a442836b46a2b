use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::status::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
}

impl NewApplication {
    pub fn pending(user_id: Uuid, job_id: Uuid, cover_letter: Option<String>) -> Self {
        Self {
            user_id,
            job_id,
            cover_letter,
            status: ApplicationStatus::Pending,
        }
    }
}

/// Row of the admin application list: the application joined with its
/// applicant and job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationOverview {
    pub id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub cover_letter: Option<String>,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub degree_class: Option<String>,
    pub profile_picture: Option<String>,
    pub cv_url: Option<String>,
    pub company: String,
    pub position: String,
    pub user_id: Uuid,
    pub job_id: Uuid,
}

/// Optional, AND-combined constraints on the admin application list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub degree_class: Option<String>,
}
