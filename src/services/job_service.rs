use tracing::info;
use uuid::Uuid;

use crate::dto::job_dto::{ApplyJobPayload, CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::activity_log::NewActivity;
use crate::models::application::{Application, NewApplication};
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::notification::NewNotification;
use crate::models::status::JobStatus;
use crate::models::user::{non_blank, User};
use crate::repositories::Repositories;
use crate::services::email_templates;
use crate::services::mailer::{best_effort, Notifier};

#[derive(Clone)]
pub struct JobService {
    repos: Repositories,
    notifier: Notifier,
}

impl JobService {
    pub fn new(repos: Repositories, notifier: Notifier) -> Self {
        Self { repos, notifier }
    }

    pub async fn create(&self, owner_id: Uuid, payload: CreateJobPayload) -> Result<Job> {
        let status = match non_blank(payload.status) {
            Some(raw) => raw.parse::<JobStatus>()?,
            None => JobStatus::Open,
        };
        let new_job = NewJob {
            company: payload.company.trim().to_string(),
            position: payload.position.trim().to_string(),
            status,
            date_applied: payload.date_applied,
            notes: non_blank(payload.notes),
        };

        let job = self.repos.jobs.insert(owner_id, &new_job).await?;
        self.repos.activity.record(&NewActivity::job_added(job.id)).await?;
        info!(job_id = %job.id, %owner_id, "Job created");

        if let Some(owner) = self.load_user(owner_id).await {
            self.notifier
                .send(&email_templates::job_added(&owner.contact(), &job))
                .await;
        }
        Ok(job)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Job>> {
        self.repos.jobs.list_by_owner(owner_id).await
    }

    /// A changed status writes one `status_updated` entry and emails the
    /// owner. Re-sending the stored status is a plain field update.
    pub async fn update(&self, job_id: Uuid, owner_id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let status = non_blank(payload.status)
            .map(|raw| raw.parse::<JobStatus>())
            .transpose()?;
        let changes = JobChanges {
            company: non_blank(payload.company),
            position: non_blank(payload.position),
            status,
            date_applied: payload.date_applied,
            notes: non_blank(payload.notes),
        };

        let update = self
            .repos
            .jobs
            .update_owned(job_id, owner_id, &changes)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        if update.status_changed() {
            self.repos
                .activity
                .record(&NewActivity::status_updated(
                    job_id,
                    &update.previous_status,
                    &update.job.status,
                ))
                .await?;
            info!(%job_id, from = %update.previous_status, to = %update.job.status, "Job status changed");

            if let Some(owner) = self.load_user(owner_id).await {
                let email = email_templates::job_status_changed(
                    &owner.contact(),
                    &update.job,
                    &update.previous_status,
                    &update.job.status,
                );
                self.notifier.send(&email).await;
            }
        }
        Ok(update.job)
    }

    pub async fn delete(&self, job_id: Uuid, owner_id: Uuid) -> Result<Job> {
        let job = self
            .repos
            .jobs
            .delete_owned(job_id, owner_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        info!(%job_id, %owner_id, "Job deleted");
        Ok(job)
    }

    pub async fn apply(&self, job_id: Uuid, applicant_id: Uuid, payload: ApplyJobPayload) -> Result<Application> {
        let job = self
            .repos
            .jobs
            .find_by_id(job_id)
            .await?
            .filter(Job::is_open)
            .ok_or_else(|| Error::NotFound("Job not found or not open".to_string()))?;

        if self
            .repos
            .applications
            .find_by_user_and_job(applicant_id, job_id)
            .await?
            .is_some()
        {
            return Err(Error::DuplicateApplication);
        }

        let cover_letter = non_blank(payload.cover_letter);
        let application = self
            .repos
            .applications
            .insert(&NewApplication::pending(applicant_id, job_id, cover_letter.clone()))
            .await?;
        self.repos.jobs.set_status(job_id, JobStatus::Applied).await?;
        self.repos
            .activity
            .record(&NewActivity::status_updated(
                job_id,
                &job.status,
                JobStatus::Applied.as_str(),
            ))
            .await?;

        if let Some(applicant) = self.load_user(applicant_id).await {
            let email = email_templates::applied_to_job(
                &applicant.contact(),
                &job,
                cover_letter.as_deref(),
                application.applied_at,
            );
            self.notifier.send(&email).await;
        }

        best_effort(
            "record application notification",
            self.repos.notifications.insert(&NewNotification {
                user_id: applicant_id,
                application_id: Some(application.id),
                message: format!(
                    "Your application for {} at {} has been submitted.",
                    job.position, job.company
                ),
            }),
        )
        .await;

        info!(application_id = %application.id, %job_id, %applicant_id, "Applied to job");
        Ok(application)
    }

    /// Recipient lookup for an email; a failed lookup only costs the email.
    async fn load_user(&self, id: Uuid) -> Option<User> {
        best_effort("load email recipient", self.repos.users.find_by_id(id))
            .await
            .flatten()
    }
}
