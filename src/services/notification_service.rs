use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::Notification;
use crate::repositories::Repositories;

/// The caller's own notification ledger.
#[derive(Clone)]
pub struct NotificationService {
    repos: Repositories,
}

impl NotificationService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.repos.notifications.list_for_user(user_id).await
    }

    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        self.repos
            .notifications
            .mark_read(id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }
}
