use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::application::Application;

/// Body of `POST /api/applications/apply/:job_id`. Document references are
/// optional and merged into the applicant's profile when non-blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitApplicationPayload {
    pub cover_letter: Option<String>,
    pub profile_picture: Option<String>,
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedApplication {
    #[serde(flatten)]
    pub application: Application,
    pub profile_picture: Option<String>,
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusPayload {
    #[serde(alias = "applicationIds", alias = "ids")]
    pub application_ids: Vec<Uuid>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    pub message: String,
    pub updated_count: usize,
    pub updated_ids: Vec<Uuid>,
    /// Rows whose status email was delivered.
    pub notified: usize,
}
