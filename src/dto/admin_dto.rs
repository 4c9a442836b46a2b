use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::application::ApplicationOverview;

/// Query string of the admin application list. Every filter is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
    #[serde(alias = "ageMin")]
    pub age_min: Option<i32>,
    #[serde(alias = "ageMax")]
    pub age_max: Option<i32>,
    #[serde(alias = "degreeClass")]
    pub degree_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total_applications: i64,
    pub status_breakdown: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total_jobs: i64,
    pub status_breakdown: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationOverview>,
    pub total: usize,
}
