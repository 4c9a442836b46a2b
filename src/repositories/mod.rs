//! Persistence seams.
//!
//! Each entity gets a trait and a Postgres implementation. Workflows only see
//! the traits, bundled in [`Repositories`], so tests can substitute an
//! in-memory store.

pub mod activity_log_repository;
pub mod application_repository;
pub mod job_repository;
pub mod notification_repository;
pub mod user_repository;

use std::sync::Arc;

use sqlx::PgPool;

pub use activity_log_repository::{ActivityLogRepository, PgActivityLogRepository};
pub use application_repository::{ApplicationRepository, PgApplicationRepository};
pub use job_repository::{JobRepository, PgJobRepository};
pub use notification_repository::{NotificationRepository, PgNotificationRepository};
pub use user_repository::{PgUserRepository, UserRepository};

/// Process-scoped handles to every repository, built once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub activity: Arc<dyn ActivityLogRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            jobs: Arc::new(PgJobRepository::new(pool.clone())),
            applications: Arc::new(PgApplicationRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            activity: Arc::new(PgActivityLogRepository::new(pool)),
        }
    }
}
