use std::collections::BTreeMap;

use crate::dto::admin_dto::{ApplicationListQuery, ApplicationStats, JobStats};
use crate::error::Result;
use crate::models::application::{ApplicationFilter, ApplicationOverview};
use crate::models::status::{ApplicationStatus, JobStatus};
use crate::models::user::non_blank;
use crate::repositories::Repositories;

/// Read-only rollups for the admin dashboard.
#[derive(Clone)]
pub struct AdminService {
    repos: Repositories,
}

impl AdminService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn application_stats(&self) -> Result<ApplicationStats> {
        let counts = self.repos.applications.status_counts().await?;
        let (total, breakdown) =
            seed_breakdown(ApplicationStatus::ALL.map(ApplicationStatus::as_str), counts);
        Ok(ApplicationStats {
            total_applications: total,
            status_breakdown: breakdown,
        })
    }

    pub async fn job_stats(&self) -> Result<JobStats> {
        let counts = self.repos.jobs.status_counts().await?;
        let (total, breakdown) = seed_breakdown(JobStatus::ALL.map(JobStatus::as_str), counts);
        Ok(JobStats {
            total_jobs: total,
            status_breakdown: breakdown,
        })
    }

    pub async fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> Result<Vec<ApplicationOverview>> {
        let filter = ApplicationFilter {
            status: non_blank(query.status)
                .map(|raw| raw.parse::<ApplicationStatus>())
                .transpose()?,
            age_min: query.age_min,
            age_max: query.age_max,
            degree_class: non_blank(query.degree_class),
        };
        self.repos.applications.list_overview(&filter).await
    }
}

/// Zero-seeds every known status, then adds the stored counts. Statuses
/// outside the vocabulary keep their own key. Returns `(total, breakdown)`.
pub fn seed_breakdown<const N: usize>(
    known: [&'static str; N],
    counts: Vec<(String, i64)>,
) -> (i64, BTreeMap<String, i64>) {
    let mut breakdown: BTreeMap<String, i64> =
        known.iter().map(|status| (status.to_string(), 0)).collect();
    let mut total = 0;
    for (status, count) in counts {
        total += count;
        *breakdown.entry(status).or_insert(0) += count;
    }
    (total, breakdown)
}
