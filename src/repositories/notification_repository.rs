use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::notification::{NewNotification, Notification};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>>;
}

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, application_id, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, application_id, message, is_read, created_at
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.application_id)
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, application_id, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, application_id, message, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
