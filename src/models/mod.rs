pub mod activity_log;
pub mod application;
pub mod job;
pub mod notification;
pub mod status;
pub mod user;
