pub mod account_service;
pub mod admin_service;
pub mod application_service;
pub mod email_templates;
pub mod job_service;
pub mod mailer;
pub mod notification_service;
