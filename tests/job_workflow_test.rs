mod common;

use common::{TestApp, PASSWORD};
use jobtrack_backend::dto::auth_dto::{
    LoginPayload, RegisterPayload, ResetPasswordPayload, SkillsInput, UpdateProfilePayload,
};
use jobtrack_backend::dto::job_dto::{ApplyJobPayload, CreateJobPayload, UpdateJobPayload};
use jobtrack_backend::error::ErrorKind;
use jobtrack_backend::models::activity_log::{ACTION_JOB_ADDED, ACTION_STATUS_UPDATED};
use jobtrack_backend::models::status::JobStatus;
use tokio_test::assert_ok;
use uuid::Uuid;

fn new_job(status: Option<&str>) -> CreateJobPayload {
    CreateJobPayload {
        company: " Acme ".to_string(),
        position: "Engineer".to_string(),
        status: status.map(str::to_string),
        date_applied: None,
        notes: Some("Referral".to_string()),
    }
}

fn status_change(status: &str) -> UpdateJobPayload {
    UpdateJobPayload {
        status: Some(status.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_defaults_to_open_and_logs_job_added() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);

    let job = assert_ok!(app.state.job_service.create(owner.id, new_job(None)).await);

    assert_eq!(job.status, "Open");
    assert_eq!(job.company, "Acme");
    let log = app.store.activity_for(job.id);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, ACTION_JOB_ADDED);
    let sent = app.mail.sent_to("owner@example.com");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New Job Added - Engineer at Acme");
}

#[tokio::test]
async fn create_rejects_status_outside_vocabulary() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);

    let err = app
        .state
        .job_service
        .create(owner.id, new_job(Some("Ghosted")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(app.state.job_service.list(owner.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_change_logs_exactly_one_entry() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);

    let updated = assert_ok!(
        app.state
            .job_service
            .update(job.id, owner.id, status_change("Applied"))
            .await
    );
    assert_eq!(updated.status, "Applied");

    let log = app.store.activity_for(job.id);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, ACTION_STATUS_UPDATED);
    assert_eq!(log[0].old_status.as_deref(), Some("Open"));
    assert_eq!(log[0].new_status.as_deref(), Some("Applied"));

    let sent = app.mail.sent_to("owner@example.com");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("Great start!"));
}

#[tokio::test]
async fn same_status_update_logs_nothing() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);

    let updated = assert_ok!(
        app.state
            .job_service
            .update(
                job.id,
                owner.id,
                UpdateJobPayload {
                    status: Some("Open".to_string()),
                    notes: Some("Called recruiter".to_string()),
                    ..Default::default()
                },
            )
            .await
    );

    assert_eq!(updated.notes.as_deref(), Some("Called recruiter"));
    assert!(app.store.activity_for(job.id).is_empty());
    assert!(app.mail.sent().is_empty());
}

#[tokio::test]
async fn updates_are_scoped_to_the_owner() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let stranger = app.store.seed_user("Eve", "eve@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);

    let err = app
        .state
        .job_service
        .update(job.id, stranger.id, status_change("Offered"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(app.store.job(job.id).unwrap().status, "Open");

    let err = app
        .state
        .job_service
        .delete(job.id, stranger.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn invalid_status_on_update_leaves_job_untouched() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Interview);

    let err = app
        .state
        .job_service
        .update(job.id, owner.id, status_change("interview"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(app.store.job(job.id).unwrap().status, "Interview");
}

#[tokio::test]
async fn jobs_with_applications_cannot_be_deleted() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let applicant = app.store.seed_user("Ada", "ada@example.com", false);
    let busy = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);
    let idle = app.store.seed_job(owner.id, "Initech", "Analyst", JobStatus::Open);
    app.store.seed_application(applicant.id, busy.id, "Pending");

    let err = app.state.job_service.delete(busy.id, owner.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(app.store.applications().len(), 1);

    assert_ok!(app.state.job_service.delete(idle.id, owner.id).await);
    assert!(app.store.job(idle.id).is_none());
}

#[tokio::test]
async fn apply_marks_job_applied_and_writes_ledger() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let applicant = app.store.seed_user("Ada", "ada@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);

    let application = assert_ok!(
        app.state
            .job_service
            .apply(
                job.id,
                applicant.id,
                ApplyJobPayload {
                    cover_letter: Some("x".repeat(150)),
                },
            )
            .await
    );

    assert_eq!(application.status, "Pending");
    assert_eq!(app.store.job(job.id).unwrap().status, "Applied");
    let log = app.store.activity_for(job.id);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, ACTION_STATUS_UPDATED);
    assert_eq!(log[0].old_status.as_deref(), Some("Open"));
    assert_eq!(log[0].new_status.as_deref(), Some("Applied"));
    let ledger = app.store.notifications();
    assert_eq!(ledger.len(), 1);
    assert_eq!(
        ledger[0].message,
        "Your application for Engineer at Acme has been submitted."
    );
    let sent = app.mail.sent_to("ada@example.com");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html.contains(&format!("{}...", "x".repeat(100))));

    let err = app
        .state
        .job_service
        .apply(job.id, applicant.id, ApplyJobPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn apply_to_open_job_twice_is_duplicate() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let applicant = app.store.seed_user("Ada", "ada@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);
    app.store.seed_application(applicant.id, job.id, "Pending");

    let err = app
        .state
        .job_service
        .apply(job.id, applicant.id, ApplyJobPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateApplication);
    assert_eq!(app.store.applications().len(), 1);
    assert_eq!(app.store.job(job.id).unwrap().status, "Open");
}

#[tokio::test]
async fn apply_to_missing_job_is_not_found() {
    let app = TestApp::new();
    let applicant = app.store.seed_user("Ada", "ada@example.com", false);

    let err = app
        .state
        .job_service
        .apply(Uuid::new_v4(), applicant.id, ApplyJobPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn profile_update_coalesces_blank_fields() {
    let app = TestApp::new();
    let user = app.store.seed_user("Ada", "ada@example.com", false);
    app.store.edit_user(user.id, |user| {
        user.profile_picture = Some("A".to_string());
        user.bio = Some("Old bio".to_string());
    });

    let updated = assert_ok!(
        app.state
            .account_service
            .update_profile(
                user.id,
                UpdateProfilePayload {
                    profile_picture: Some(String::new()),
                    bio: Some("New bio".to_string()),
                    skills: Some(SkillsInput::Text("rust, sql".to_string())),
                    ..Default::default()
                },
            )
            .await
    );

    assert_eq!(updated.profile_picture.as_deref(), Some("A"));
    assert_eq!(updated.bio.as_deref(), Some("New bio"));
    assert_eq!(
        updated.skills,
        Some(vec!["rust".to_string(), "sql".to_string()])
    );
}

#[tokio::test]
async fn account_lifecycle_register_verify_login_reset() {
    let app = TestApp::new();
    let accounts = &app.state.account_service;

    let user = assert_ok!(
        accounts
            .register(RegisterPayload {
                name: "Ada".to_string(),
                email: "Ada@Example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
    );
    assert_eq!(user.email, "ada@example.com");
    let welcome = app.mail.sent_to("ada@example.com");
    assert_eq!(welcome.len(), 1);
    assert!(welcome[0].text.contains("https://app.test/verify?token="));

    let login = |password: &str| LoginPayload {
        email: "ada@example.com".to_string(),
        password: password.to_string(),
    };
    let err = accounts.login(login(PASSWORD)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let token = app.store.user(user.id).unwrap().verification_token.unwrap();
    assert_ok!(accounts.verify_email(&token).await);
    let err = accounts.verify_email(&token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = accounts.login(login("wrong-password")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let session = assert_ok!(accounts.login(login(PASSWORD)).await);
    let identity = assert_ok!(app.state.tokens.authorize(&session.token));
    assert_eq!(identity.subject_id, user.id);
    assert!(!identity.is_admin());

    assert_ok!(accounts.forgot_password("ada@example.com").await);
    let reset_token = app.store.user(user.id).unwrap().reset_token.unwrap();
    assert_ok!(
        accounts
            .reset_password(ResetPasswordPayload {
                token: reset_token,
                password: "new-password".to_string(),
            })
            .await
    );
    assert_ok!(accounts.login(login("new-password")).await);

    let err = accounts
        .register(RegisterPayload {
            name: "Ada again".to_string(),
            email: "ada@example.com".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn forgot_password_surfaces_mail_failure() {
    let app = TestApp::new();
    app.store.seed_user("Ada", "ada@example.com", false);
    app.mail.set_failing(true);

    let err = app
        .state
        .account_service
        .forgot_password("ada@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);

    let err = app
        .state
        .account_service
        .forgot_password("nobody@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn blank_notes_keep_stored_notes() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let job = assert_ok!(app.state.job_service.create(owner.id, new_job(None)).await);

    let updated = assert_ok!(
        app.state
            .job_service
            .update(
                job.id,
                owner.id,
                UpdateJobPayload {
                    notes: Some("  ".to_string()),
                    position: Some("Senior Engineer".to_string()),
                    ..Default::default()
                },
            )
            .await
    );

    assert_eq!(updated.notes.as_deref(), Some("Referral"));
    assert_eq!(updated.position, "Senior Engineer");
}

#[tokio::test]
async fn job_changes_persist_when_mail_fails() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    app.mail.set_failing(true);

    let job = assert_ok!(app.state.job_service.create(owner.id, new_job(None)).await);
    assert!(app.store.job(job.id).is_some());

    let updated = assert_ok!(
        app.state
            .job_service
            .update(job.id, owner.id, status_change("Interview"))
            .await
    );
    assert_eq!(updated.status, "Interview");
    assert_eq!(app.store.job(job.id).unwrap().status, "Interview");
    assert_eq!(app.store.activity_for(job.id).len(), 2);
    assert_eq!(app.state.notifier.stats().failed, 2);
}

#[tokio::test]
async fn apply_succeeds_when_mail_and_ledger_fail() {
    let app = TestApp::new();
    let owner = app.store.seed_user("Owner", "owner@example.com", false);
    let applicant = app.store.seed_user("Ada", "ada@example.com", false);
    let job = app.store.seed_job(owner.id, "Acme", "Engineer", JobStatus::Open);
    app.mail.set_failing(true);
    app.store.fail_notification_inserts(true);

    let application = assert_ok!(
        app.state
            .job_service
            .apply(job.id, applicant.id, ApplyJobPayload::default())
            .await
    );

    assert!(app.store.application(application.id).is_some());
    assert_eq!(app.store.job(job.id).unwrap().status, "Applied");
    assert!(app.store.notifications().is_empty());
    assert_eq!(app.mail.sent_to("ada@example.com").len(), 1);
}
