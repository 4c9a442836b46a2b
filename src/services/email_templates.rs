//! Rendered notification emails. Every builder produces both bodies; values
//! coming from users are escaped before they reach the HTML body.

use chrono::{DateTime, Utc};

use crate::models::job::Job;
use crate::models::status::{
    application_color, application_icon, application_message, application_next_steps_html,
    application_next_steps_text, job_color, job_transition_message,
};
use crate::models::user::UserContact;
use crate::services::mailer::OutgoingEmail;
use crate::utils::time::display_date;

const SIGNATURE_TEXT: &str = "Best regards,\nJobTracker Pro Team";
const COVER_LETTER_PREVIEW: usize = 100;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
<div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; text-align: center; border-radius: 10px 10px 0 0;">
<h1 style="color: white; margin: 0;">{title}</h1>
</div>
<div style="background: #f8f9fa; padding: 30px; border-radius: 0 0 10px 10px;">
{body}
</div>
<div style="text-align: center; margin-top: 30px; color: #666; font-size: 14px;">
<p>Best regards,<br><strong>The JobTracker Pro Team</strong></p>
<p>Track smarter &bull; Interview better &bull; Land faster</p>
</div>
</body>
</html>"#
    )
}

fn badge(label: &str, color: &str) -> String {
    format!(
        r#"<span style="background: {}; color: white; padding: 4px 12px; border-radius: 20px; font-weight: bold;">{}</span>"#,
        color,
        escape_html(label)
    )
}

fn preview(cover_letter: &str) -> String {
    let mut chars = cover_letter.chars();
    let head: String = chars.by_ref().take(COVER_LETTER_PREVIEW).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Confirmation for the applications endpoint.
pub fn application_submitted(user: &UserContact, job: &Job) -> OutgoingEmail {
    let text = format!(
        "Hi {},\n\nYour application for {} at {} has been submitted successfully. Status: Pending.\n\n{}",
        user.name, job.position, job.company, SIGNATURE_TEXT
    );
    let body = format!(
        "<p>Hi <strong>{}</strong>,</p><p>Your application for <strong>{}</strong> at <strong>{}</strong> has been submitted successfully.</p><p>Status: {}</p>",
        escape_html(&user.name),
        escape_html(&job.position),
        escape_html(&job.company),
        badge("Pending", application_color("Pending")),
    );
    OutgoingEmail {
        to: user.email.clone(),
        subject: "Application Submitted".to_string(),
        html: layout("Application Submitted", &body),
        text,
    }
}

/// Sent when an administrator moves an application to `status`.
/// Without the job the message falls back to generic wording.
pub fn application_status_changed(
    user: &UserContact,
    job: Option<&Job>,
    status: &str,
    dashboard_url: &str,
) -> OutgoingEmail {
    let (subject, target_text, target_html) = match job {
        Some(job) => (
            format!("Application Update - {} at {}", job.position, job.company),
            format!("Your application for {} at {}", job.position, job.company),
            format!(
                "Your application for <strong>{}</strong> at <strong>{}</strong>",
                escape_html(&job.position),
                escape_html(&job.company)
            ),
        ),
        None => (
            "Application Update".to_string(),
            "Your application".to_string(),
            "Your application".to_string(),
        ),
    };

    let text = format!(
        "Application Status Update\n\nHello {},\n\n{} has been updated.\n\nNew Status: {}\n\n{}\n\n{}\n\nView your dashboard: {}\n\n{}",
        user.name,
        target_text,
        status,
        application_message(status),
        application_next_steps_text(status),
        dashboard_url,
        SIGNATURE_TEXT
    );
    let body = format!(
        r#"<p>Hello <strong>{name}</strong>,</p>
<p>{target} has been updated.</p>
<p style="text-align: center; font-size: 40px; margin: 10px 0;">{icon}</p>
<p style="text-align: center;">{badge}</p>
<p>{message}</p>
{next_steps}
<p style="text-align: center;"><a href="{dashboard}" style="background: #667eea; color: white; padding: 12px 30px; text-decoration: none; border-radius: 8px;">View Dashboard</a></p>"#,
        name = escape_html(&user.name),
        target = target_html,
        icon = application_icon(status),
        badge = badge(status, application_color(status)),
        message = application_message(status),
        next_steps = application_next_steps_html(status),
        dashboard = escape_html(dashboard_url),
    );
    OutgoingEmail {
        to: user.email.clone(),
        subject,
        html: layout("Application Status Update", &body),
        text,
    }
}

pub fn job_added(user: &UserContact, job: &Job) -> OutgoingEmail {
    let date = job
        .date_applied
        .map(display_date)
        .unwrap_or_else(|| "Not set".to_string());
    let text = format!(
        "New Job Added!\n\nHello {},\n\nYou've added a new job: {} at {}.\nStatus: {}\nDate Applied: {}\n\nGood luck with your application!\n\n{}",
        user.name, job.position, job.company, job.status, date, SIGNATURE_TEXT
    );
    let notes = job
        .notes
        .as_deref()
        .filter(|notes| !notes.is_empty())
        .map(|notes| format!("<p><strong>Notes:</strong> {}</p>", escape_html(notes)))
        .unwrap_or_default();
    let body = format!(
        r#"<p>Hello <strong>{}</strong>,</p>
<p>You've successfully added a new job to your JobTracker Pro dashboard.</p>
<div style="background: white; padding: 20px; border-radius: 8px; border-left: 4px solid #667eea;">
<h3 style="margin: 0 0 10px 0;">{}</h3>
<p><strong>Company:</strong> {}</p>
<p><strong>Status:</strong> {}</p>
<p><strong>Date Applied:</strong> {}</p>
{}
</div>
<p><strong>What's next?</strong></p>
<ul><li>Track your application progress</li><li>Update the status as you move forward</li><li>Add interview notes and follow-up dates</li></ul>"#,
        escape_html(&user.name),
        escape_html(&job.position),
        escape_html(&job.company),
        badge(&job.status, job_color(&job.status)),
        date,
        notes,
    );
    OutgoingEmail {
        to: user.email.clone(),
        subject: format!("New Job Added - {} at {}", job.position, job.company),
        html: layout("New Job Added", &body),
        text,
    }
}

pub fn job_status_changed(user: &UserContact, job: &Job, old_status: &str, new_status: &str) -> OutgoingEmail {
    let message = job_transition_message(old_status, new_status);
    let text = format!(
        "Application Status Updated!\n\nHello {},\n\nYour application for {} at {} has been updated:\nFrom: {}\nTo: {}\n\n{}\n\n{}",
        user.name, job.position, job.company, old_status, new_status, message, SIGNATURE_TEXT
    );
    let body = format!(
        r#"<p>Hello <strong>{}</strong>,</p>
<p>Your application for <strong>{}</strong> at <strong>{}</strong> has been updated.</p>
<p style="text-align: center;">{} &rarr; {}</p>
<p style="text-align: center; font-style: italic;">{}</p>"#,
        escape_html(&user.name),
        escape_html(&job.position),
        escape_html(&job.company),
        badge(old_status, job_color(old_status)),
        badge(new_status, job_color(new_status)),
        message,
    );
    OutgoingEmail {
        to: user.email.clone(),
        subject: format!("Status Updated - {} at {}", job.position, job.company),
        html: layout("Status Updated", &body),
        text,
    }
}

/// Confirmation for applying through the jobs endpoint.
pub fn applied_to_job(
    user: &UserContact,
    job: &Job,
    cover_letter: Option<&str>,
    applied_at: DateTime<Utc>,
) -> OutgoingEmail {
    let date = display_date(applied_at.date_naive());
    let text = format!(
        "Congratulations! Application Submitted!\n\nHello {},\n\nYour application for {} at {} has been successfully submitted.\n\nApplied on: {}\n\nWhat's next?\n- Prepare for potential interviews\n- Research the company thoroughly\n- Follow up in 1-2 weeks\n- Continue applying to other opportunities\n\nBest of luck!\n\n{}",
        user.name, job.position, job.company, date, SIGNATURE_TEXT
    );
    let quote = cover_letter
        .filter(|letter| !letter.is_empty())
        .map(|letter| format!(r#"<p style="font-style: italic; text-align: center;">"{}"</p>"#, escape_html(&preview(letter))))
        .unwrap_or_default();
    let body = format!(
        r#"<h2>Congratulations, {}!</h2>
<p>Your job application has been successfully submitted. You're one step closer to your dream job!</p>
<div style="background: white; padding: 25px; border-radius: 10px; border-left: 4px solid #10b981; text-align: center;">
<h3 style="margin: 0 0 15px 0;">{}</h3>
<p><strong>{}</strong></p>
<p>Applied on: {}</p>
{}
</div>
<p><strong>What's next?</strong></p>
<ul><li>Prepare for potential interviews</li><li>Research the company thoroughly</li><li>Follow up in 1-2 weeks if you don't hear back</li><li>Continue applying to other opportunities</li></ul>"#,
        escape_html(&user.name),
        escape_html(&job.position),
        escape_html(&job.company),
        date,
        quote,
    );
    OutgoingEmail {
        to: user.email.clone(),
        subject: format!("Application Submitted - {} at {}", job.position, job.company),
        html: layout("Application Submitted!", &body),
        text,
    }
}

pub fn welcome(name: &str, email: &str, verification_link: &str) -> OutgoingEmail {
    let text = format!(
        "Welcome to JobTracker Pro, {}!\n\nPlease verify your email address by opening the link below:\n{}\n\n{}",
        name, verification_link, SIGNATURE_TEXT
    );
    let body = format!(
        r#"<h2>Welcome to JobTracker Pro, {}!</h2>
<p>We're excited to have you on board. To get started with managing your job applications, please verify your email address.</p>
<p style="text-align: center;"><a href="{}" style="background: #667eea; color: white; padding: 12px 30px; text-decoration: none; border-radius: 8px;">Verify Email</a></p>"#,
        escape_html(name),
        escape_html(verification_link),
    );
    OutgoingEmail {
        to: email.to_string(),
        subject: "Welcome to JobTracker Pro - Verify Your Email".to_string(),
        html: layout("Welcome!", &body),
        text,
    }
}

pub fn password_reset(name: &str, email: &str, reset_link: &str) -> OutgoingEmail {
    let text = format!(
        "Password Reset Request\n\nHello {}!\n\nWe received a request to reset your password. Click the link below to reset it:\n{}\n\nIf you didn't request this, please ignore this email.\n\n{}",
        name, reset_link, SIGNATURE_TEXT
    );
    let body = format!(
        r#"<p>Hello <strong>{}</strong>!</p>
<p>We received a request to reset your password.</p>
<p style="text-align: center;"><a href="{}" style="background: #667eea; color: white; padding: 12px 30px; text-decoration: none; border-radius: 8px;">Reset Your Password</a></p>
<p>If you didn't request this, please ignore this email.</p>"#,
        escape_html(name),
        escape_html(reset_link),
    );
    OutgoingEmail {
        to: email.to_string(),
        subject: "Reset Your Password - JobTracker Pro".to_string(),
        html: layout("Password Reset", &body),
        text,
    }
}
