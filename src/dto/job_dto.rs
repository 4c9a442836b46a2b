use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::Application;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 255))]
    pub company: String,
    #[validate(length(min = 1, max = 255))]
    pub position: String,
    /// Defaults to `Open`.
    pub status: Option<String>,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Absent or blank fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[validate(length(max = 255))]
    pub position: Option<String>,
    pub status: Option<String>,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyJobPayload {
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyJobResponse {
    pub message: String,
    pub application: Application,
}
