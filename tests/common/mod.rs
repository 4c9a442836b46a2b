#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use jobtrack_backend::config::Config;
use jobtrack_backend::error::{Error, Result};
use jobtrack_backend::middleware::auth::Role;
use jobtrack_backend::models::activity_log::{ActivityLog, NewActivity};
use jobtrack_backend::models::application::{
    Application, ApplicationFilter, ApplicationOverview, NewApplication,
};
use jobtrack_backend::models::job::{Job, JobChanges, JobUpdate, NewJob};
use jobtrack_backend::models::notification::{NewNotification, Notification};
use jobtrack_backend::models::status::{ApplicationStatus, JobStatus};
use jobtrack_backend::models::user::{NewUser, ProfileChanges, ProfileDocuments, User};
use jobtrack_backend::repositories::{
    ActivityLogRepository, ApplicationRepository, JobRepository, NotificationRepository,
    Repositories, UserRepository,
};
use jobtrack_backend::routes::build_router;
use jobtrack_backend::services::mailer::{MailChannel, Notifier, OutgoingEmail};
use jobtrack_backend::utils::crypto::hash_password;
use jobtrack_backend::AppState;

pub const PASSWORD: &str = "password123";

/// Hashing is slow in debug builds, so seeded users share one hash.
fn seeded_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
    activity: Vec<ActivityLog>,
}

/// In-memory stand-in for the Postgres repositories. Rows are kept in
/// insertion order, so "newest first" is reverse iteration.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_notifications: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            jobs: self.clone(),
            applications: self.clone(),
            notifications: self.clone(),
            activity: self.clone(),
        }
    }

    /// Makes every notification insert fail with a storage error.
    pub fn fail_notification_inserts(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn seed_user(&self, name: &str, email: &str, is_admin: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: seeded_password_hash(),
            phone: None,
            bio: None,
            location: None,
            profile_picture: None,
            skills: None,
            education_level: None,
            education_grade: None,
            age: None,
            experience: None,
            cv_url: None,
            verification_token: None,
            reset_token: None,
            is_verified: true,
            is_admin,
            created_at: Utc::now(),
        };
        self.tables().users.push(user.clone());
        user
    }

    pub fn edit_user(&self, id: Uuid, edit: impl FnOnce(&mut User)) {
        let mut tables = self.tables();
        let user = tables.users.iter_mut().find(|u| u.id == id).unwrap();
        edit(user);
    }

    pub fn seed_job(&self, owner_id: Uuid, company: &str, position: &str, status: JobStatus) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            user_id: owner_id,
            company: company.to_string(),
            position: position.to_string(),
            status: status.as_str().to_string(),
            date_applied: None,
            notes: None,
            created_at: Utc::now(),
        };
        self.tables().jobs.push(job.clone());
        job
    }

    /// Inserts an application row directly, bypassing the workflow.
    pub fn seed_application(&self, user_id: Uuid, job_id: Uuid, status: &str) -> Application {
        let application = Application {
            id: Uuid::new_v4(),
            user_id,
            job_id,
            status: status.to_string(),
            cover_letter: None,
            applied_at: Utc::now(),
        };
        self.tables().applications.push(application.clone());
        application
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.tables().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn job(&self, id: Uuid) -> Option<Job> {
        self.tables().jobs.iter().find(|j| j.id == id).cloned()
    }

    pub fn application(&self, id: Uuid) -> Option<Application> {
        self.tables().applications.iter().find(|a| a.id == id).cloned()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.tables().applications.clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.tables().notifications.clone()
    }

    pub fn activity_for(&self, job_id: Uuid) -> Vec<ActivityLog> {
        self.tables()
            .activity
            .iter()
            .filter(|entry| entry.job_id == job_id)
            .cloned()
            .collect()
    }

    fn overview(tables: &Tables, application: &Application) -> Option<ApplicationOverview> {
        let user = tables.users.iter().find(|u| u.id == application.user_id)?;
        let job = tables.jobs.iter().find(|j| j.id == application.job_id)?;
        Some(ApplicationOverview {
            id: application.id,
            status: application.status.clone(),
            applied_at: application.applied_at,
            cover_letter: application.cover_letter.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            degree_class: user.education_grade.clone(),
            profile_picture: user.profile_picture.clone(),
            cv_url: user.cv_url.clone(),
            company: job.company.clone(),
            position: job.position.clone(),
            user_id: application.user_id,
            job_id: application.job_id,
        })
    }
}

fn count_by_status<'a>(statuses: impl Iterator<Item = &'a String>) -> Vec<(String, i64)> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for status in statuses {
        *counts.entry(status.clone()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

fn keep_or_replace<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

fn keep_or_set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *slot = value.clone();
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(Error::InvalidInput("User already exists".to_string()));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            phone: None,
            bio: None,
            location: None,
            profile_picture: None,
            skills: None,
            education_level: None,
            education_grade: None,
            age: None,
            experience: None,
            cv_url: None,
            verification_token: Some(user.verification_token.clone()),
            reset_token: None,
            is_verified: false,
            is_admin: false,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn merge_documents(&self, id: Uuid, documents: &ProfileDocuments) -> Result<Option<ProfileDocuments>> {
        let mut tables = self.tables();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        keep_or_set(&mut user.profile_picture, &documents.profile_picture);
        keep_or_set(&mut user.cv_url, &documents.cv_url);
        Ok(Some(user.documents()))
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<User>> {
        let mut tables = self.tables();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        keep_or_replace(&mut user.name, &changes.name);
        keep_or_set(&mut user.phone, &changes.phone);
        keep_or_set(&mut user.bio, &changes.bio);
        keep_or_set(&mut user.location, &changes.location);
        keep_or_set(&mut user.education_level, &changes.education_level);
        keep_or_set(&mut user.education_grade, &changes.education_grade);
        keep_or_set(&mut user.age, &changes.age);
        keep_or_set(&mut user.experience, &changes.experience);
        keep_or_set(&mut user.profile_picture, &changes.profile_picture);
        keep_or_set(&mut user.cv_url, &changes.cv_url);
        keep_or_set(&mut user.skills, &changes.skills);
        Ok(Some(user.clone()))
    }

    async fn verify_email(&self, token: &str) -> Result<bool> {
        let mut tables = self.tables();
        match tables
            .users
            .iter_mut()
            .find(|u| u.verification_token.as_deref() == Some(token))
        {
            Some(user) => {
                user.is_verified = true;
                user.verification_token = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_reset_token(&self, email: &str, token: &str) -> Result<bool> {
        let mut tables = self.tables();
        match tables.users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.reset_token = Some(token.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_password(&self, token: &str, password_hash: &str) -> Result<bool> {
        let mut tables = self.tables();
        match tables
            .users
            .iter_mut()
            .find(|u| u.reset_token.as_deref() == Some(token))
        {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.reset_token = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn insert(&self, owner_id: Uuid, job: &NewJob) -> Result<Job> {
        let created = Job {
            id: Uuid::new_v4(),
            user_id: owner_id,
            company: job.company.clone(),
            position: job.position.clone(),
            status: job.status.as_str().to_string(),
            date_applied: job.date_applied,
            notes: job.notes.clone(),
            created_at: Utc::now(),
        };
        self.tables().jobs.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.job(id))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Job>> {
        Ok(self
            .tables()
            .jobs
            .iter()
            .rev()
            .filter(|j| j.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_owned(&self, id: Uuid, owner_id: Uuid, changes: &JobChanges) -> Result<Option<JobUpdate>> {
        let mut tables = self.tables();
        let Some(job) = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == id && j.user_id == owner_id)
        else {
            return Ok(None);
        };
        let previous_status = job.status.clone();
        keep_or_replace(&mut job.company, &changes.company);
        keep_or_replace(&mut job.position, &changes.position);
        if let Some(status) = changes.status {
            job.status = status.as_str().to_string();
        }
        keep_or_set(&mut job.date_applied, &changes.date_applied);
        keep_or_set(&mut job.notes, &changes.notes);
        Ok(Some(JobUpdate {
            job: job.clone(),
            previous_status,
        }))
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Job>> {
        let mut tables = self.tables();
        let Some(index) = tables
            .jobs
            .iter()
            .position(|j| j.id == id && j.user_id == owner_id)
        else {
            return Ok(None);
        };
        if tables.applications.iter().any(|a| a.job_id == id) {
            return Err(Error::InvalidInput(
                "Job has applications and cannot be deleted".to_string(),
            ));
        }
        tables.activity.retain(|entry| entry.job_id != id);
        Ok(Some(tables.jobs.remove(index)))
    }

    async fn set_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>> {
        let mut tables = self.tables();
        Ok(tables.jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.status = status.as_str().to_string();
            job.clone()
        }))
    }

    async fn status_counts(&self) -> Result<Vec<(String, i64)>> {
        Ok(count_by_status(self.tables().jobs.iter().map(|j| &j.status)))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.application(id))
    }

    async fn find_by_user_and_job(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<Application>> {
        Ok(self
            .tables()
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.job_id == job_id)
            .cloned())
    }

    async fn insert(&self, application: &NewApplication) -> Result<Application> {
        let mut tables = self.tables();
        if tables
            .applications
            .iter()
            .any(|a| a.user_id == application.user_id && a.job_id == application.job_id)
        {
            return Err(Error::DuplicateApplication);
        }
        let created = Application {
            id: Uuid::new_v4(),
            user_id: application.user_id,
            job_id: application.job_id,
            status: application.status.as_str().to_string(),
            cover_letter: application.cover_letter.clone(),
            applied_at: Utc::now(),
        };
        tables.applications.push(created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Option<Application>> {
        let mut tables = self.tables();
        Ok(tables.applications.iter_mut().find(|a| a.id == id).map(|application| {
            application.status = status.as_str().to_string();
            application.clone()
        }))
    }

    async fn update_status_many(&self, ids: &[Uuid], status: ApplicationStatus) -> Result<Vec<Application>> {
        let mut tables = self.tables();
        Ok(tables
            .applications
            .iter_mut()
            .filter(|a| ids.contains(&a.id))
            .map(|application| {
                application.status = status.as_str().to_string();
                application.clone()
            })
            .collect())
    }

    async fn status_counts(&self) -> Result<Vec<(String, i64)>> {
        Ok(count_by_status(self.tables().applications.iter().map(|a| &a.status)))
    }

    async fn list_overview(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationOverview>> {
        let tables = self.tables();
        Ok(tables
            .applications
            .iter()
            .rev()
            .filter_map(|application| Self::overview(&tables, application))
            .filter(|row| filter_matches(filter, row))
            .collect())
    }

    async fn applicant_cv_url(&self, id: Uuid) -> Result<Option<String>> {
        let tables = self.tables();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| tables.users.iter().find(|u| u.id == a.user_id))
            .and_then(|u| u.cv_url.clone()))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("notification store offline".to_string()));
        }
        let created = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            application_id: notification.application_id,
            message: notification.message.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.tables().notifications.push(created.clone());
        Ok(created)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        Ok(self
            .tables()
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>> {
        let mut tables = self.tables();
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .map(|notification| {
                notification.is_read = true;
                notification.clone()
            }))
    }
}

#[async_trait]
impl ActivityLogRepository for MemoryStore {
    async fn record(&self, entry: &NewActivity) -> Result<ActivityLog> {
        let created = ActivityLog {
            id: Uuid::new_v4(),
            job_id: entry.job_id,
            action: entry.action.to_string(),
            old_status: entry.old_status.clone(),
            new_status: entry.new_status.clone(),
            created_at: Utc::now(),
        };
        self.tables().activity.push(created.clone());
        Ok(created)
    }
}

/// Mail channel that records every message and answers with a switchable
/// outcome.
#[derive(Default)]
pub struct ScriptedChannel {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl ScriptedChannel {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, email: &str) -> Vec<OutgoingEmail> {
        self.sent().into_iter().filter(|m| m.to == email).collect()
    }
}

#[async_trait]
impl MailChannel for ScriptedChannel {
    async fn send(&self, email: &OutgoingEmail) -> bool {
        self.sent.lock().unwrap().push(email.clone());
        !self.failing.load(Ordering::SeqCst)
    }
}

/// In-memory counterpart of the `WHERE` clause in `list_overview`.
fn filter_matches(filter: &ApplicationFilter, row: &ApplicationOverview) -> bool {
    filter.status.map_or(true, |status| row.status == status.as_str())
        && filter
            .age_min
            .map_or(true, |min| row.age.is_some_and(|age| age >= min))
        && filter
            .age_max
            .map_or(true, |max| row.age.is_some_and(|age| age <= max))
        && filter
            .degree_class
            .as_deref()
            .map_or(true, |degree| row.degree_class.as_deref() == Some(degree))
}

pub fn test_config() -> Config {
    let values: HashMap<&str, &str> = HashMap::from([
        ("SERVER_ADDRESS", "127.0.0.1:0"),
        ("DATABASE_URL", "postgres://unused/jobtrack"),
        ("JWT_SECRET", "test_secret_key"),
        ("MAIL_FROM", "jobs@example.com"),
        ("FRONTEND_URL", "https://app.test"),
        ("PUBLIC_RPS", "1000"),
    ]);
    Config::from_lookup(|name| values.get(name).map(|v| v.to_string())).unwrap()
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub mail: Arc<ScriptedChannel>,
    pub state: AppState,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let mail = Arc::new(ScriptedChannel::default());
        let config = test_config();
        let channel: Arc<dyn MailChannel> = mail.clone();
        let state = AppState::assemble(store.repositories(), Notifier::new(vec![channel]), &config);
        Self {
            store,
            mail,
            state,
            config,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    pub fn token_for(&self, user: &User) -> String {
        let role = if user.is_admin { Role::Admin } else { Role::Applicant };
        self.state.tokens.issue(user.id, role).unwrap()
    }

    /// Sends one request through a fresh router and returns the response.
    pub async fn call(&self, request: Request<Body>) -> Response {
        use tower::ServiceExt;
        self.router().oneshot(request).await.unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &JsonValue) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
