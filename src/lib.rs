pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;

use std::time::Duration;

use reqwest::Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::middleware::auth::TokenKeys;
use crate::repositories::Repositories;
use crate::services::{
    account_service::AccountService, admin_service::AdminService,
    application_service::ApplicationService, job_service::JobService, mailer::Notifier,
    notification_service::NotificationService,
};

const MAIL_RELAY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenKeys,
    pub notifier: Notifier,
    pub account_service: AccountService,
    pub application_service: ApplicationService,
    pub job_service: JobService,
    pub admin_service: AdminService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Result<Self> {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(MAIL_RELAY_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let notifier = Notifier::from_config(config, http_client);
        Ok(Self::assemble(Repositories::postgres(pool), notifier, config))
    }

    /// Wires services over any repository set and notifier.
    pub fn assemble(repos: Repositories, notifier: Notifier, config: &Config) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_ttl_hours);
        let dashboard_url = format!("{}/dashboard", config.frontend_url);

        Self {
            account_service: AccountService::new(
                repos.clone(),
                notifier.clone(),
                tokens.clone(),
                config.frontend_url.clone(),
            ),
            application_service: ApplicationService::new(
                repos.clone(),
                notifier.clone(),
                dashboard_url,
            ),
            job_service: JobService::new(repos.clone(), notifier.clone()),
            admin_service: AdminService::new(repos.clone()),
            notification_service: NotificationService::new(repos),
            tokens,
            notifier,
        }
    }
}
