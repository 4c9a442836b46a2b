use std::collections::HashSet;

use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::application_dto::{BatchStatusResponse, SubmitApplicationPayload, SubmittedApplication};
use crate::error::{Error, Result};
use crate::models::application::{Application, NewApplication};
use crate::models::notification::NewNotification;
use crate::models::status::ApplicationStatus;
use crate::models::user::{non_blank, ProfileDocuments};
use crate::repositories::Repositories;
use crate::services::email_templates;
use crate::services::mailer::{best_effort, Notifier};

pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully";

#[derive(Clone)]
pub struct ApplicationService {
    repos: Repositories,
    notifier: Notifier,
    dashboard_url: String,
}

impl ApplicationService {
    pub fn new(repos: Repositories, notifier: Notifier, dashboard_url: String) -> Self {
        Self {
            repos,
            notifier,
            dashboard_url,
        }
    }

    pub async fn submit(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
        payload: SubmitApplicationPayload,
    ) -> Result<SubmittedApplication> {
        if self
            .repos
            .applications
            .find_by_user_and_job(applicant_id, job_id)
            .await?
            .is_some()
        {
            return Err(Error::DuplicateApplication);
        }

        let job = self
            .repos
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        let documents = ProfileDocuments {
            profile_picture: payload.profile_picture,
            cv_url: payload.cv_url,
        }
        .non_blank();
        if !documents.is_empty() {
            self.repos
                .users
                .merge_documents(applicant_id, &documents)
                .await?
                .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        }

        let application = self
            .repos
            .applications
            .insert(&NewApplication::pending(
                applicant_id,
                job_id,
                non_blank(payload.cover_letter),
            ))
            .await?;

        let applicant = best_effort(
            "load applicant for confirmation",
            self.repos.users.find_by_id(applicant_id),
        )
        .await
        .flatten();
        match &applicant {
            Some(user) => {
                let email = email_templates::application_submitted(&user.contact(), &job);
                self.notifier.send(&email).await;
            }
            None => warn!(%applicant_id, "Applicant not found for confirmation email"),
        }

        best_effort(
            "record submission notification",
            self.repos.notifications.insert(&NewNotification {
                user_id: applicant_id,
                application_id: Some(application.id),
                message: SUBMITTED_MESSAGE.to_string(),
            }),
        )
        .await;

        info!(application_id = %application.id, %job_id, %applicant_id, "Application submitted");

        let current = applicant.map(|user| user.documents()).unwrap_or_default();
        Ok(SubmittedApplication {
            application,
            profile_picture: current.profile_picture,
            cv_url: current.cv_url,
        })
    }

    pub async fn update_status(&self, id: Uuid, raw_status: &str) -> Result<Application> {
        let status: ApplicationStatus = raw_status.parse()?;
        let application = self
            .repos
            .applications
            .update_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        self.announce_status(&application, status).await;
        info!(application_id = %id, %status, "Application status updated");
        Ok(application)
    }

    /// One set-based update, then an independent ledger row and email per
    /// updated row. Unknown ids are left out of the result.
    pub async fn update_status_batch(&self, ids: &[Uuid], raw_status: &str) -> Result<BatchStatusResponse> {
        let status: ApplicationStatus = raw_status.parse()?;

        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Err(Error::InvalidInput(
                "application_ids must be a non-empty array".to_string(),
            ));
        }

        let updated = self.repos.applications.update_status_many(&ids, status).await?;
        if updated.is_empty() {
            return Err(Error::NotFound("No applications found".to_string()));
        }

        let mut notified = 0;
        for application in &updated {
            if self.announce_status(application, status).await {
                notified += 1;
            }
        }

        info!(
            requested = ids.len(),
            updated = updated.len(),
            notified,
            %status,
            "Batch status update finished"
        );

        Ok(BatchStatusResponse {
            message: format!(
                "Successfully updated {} applications to {}",
                updated.len(),
                status
            ),
            updated_count: updated.len(),
            updated_ids: updated.iter().map(|application| application.id).collect(),
            notified,
        })
    }

    /// Where the applicant's CV lives. Admins may look at any application,
    /// applicants only at their own.
    pub async fn cv_location(&self, id: Uuid, viewer_id: Uuid, viewer_is_admin: bool) -> Result<String> {
        let application = self
            .repos
            .applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        if !viewer_is_admin && application.user_id != viewer_id {
            return Err(Error::Forbidden("Not allowed to view this CV".to_string()));
        }

        self.repos
            .applications
            .applicant_cv_url(id)
            .await?
            .and_then(|url| non_blank(Some(url)))
            .ok_or_else(|| Error::NotFound("CV not found".to_string()))
    }

    /// Writes the ledger row, then tries the email. Each step is
    /// best-effort; returns whether the email went out.
    async fn announce_status(&self, application: &Application, status: ApplicationStatus) -> bool {
        let user = best_effort(
            "load applicant for status email",
            self.repos.users.find_by_id(application.user_id),
        )
        .await
        .flatten();
        let job = best_effort(
            "load job for status message",
            self.repos.jobs.find_by_id(application.job_id),
        )
        .await
        .flatten();

        let message = match &job {
            Some(job) => format!(
                "Your application for {} at {} has been updated to: {}",
                job.position, job.company, status
            ),
            None => format!("Your application has been updated to: {}", status),
        };
        best_effort(
            "record status notification",
            self.repos.notifications.insert(&NewNotification {
                user_id: application.user_id,
                application_id: Some(application.id),
                message,
            }),
        )
        .await;

        let Some(user) = user else {
            warn!(application_id = %application.id, "Applicant not found; status email skipped");
            return false;
        };
        let email = email_templates::application_status_changed(
            &user.contact(),
            job.as_ref(),
            status.as_str(),
            &self.dashboard_url,
        );
        self.notifier.send(&email).await
    }
}
