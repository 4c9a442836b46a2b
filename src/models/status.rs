//! Closed status vocabularies for jobs and applications.
//!
//! Parsing caller input is strict: anything outside the vocabulary is
//! [`Error::InvalidInput`]. Display lookups over raw stored strings are lenient
//! and fall back to neutral values, so rendering a message never fails a
//! request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const NEUTRAL_COLOR: &str = "#6b7280";
pub const NEUTRAL_ICON: &str = "📧";
pub const GENERIC_APPLICATION_MESSAGE: &str = "Your application status has been updated.";
pub const GENERIC_NEXT_STEPS_TEXT: &str = "Check your dashboard for more details.";
pub const GENERIC_TRANSITION_MESSAGE: &str = "Your application progress has been updated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Accepted,
    Rejected,
}

/// Heading plus bullet list shown under an application status email.
#[derive(Debug, Clone, Copy)]
pub struct NextSteps {
    pub icon: &'static str,
    pub heading: &'static str,
    pub items: &'static [&'static str],
}

impl NextSteps {
    pub fn to_html(&self) -> String {
        let items: String = self
            .items
            .iter()
            .map(|item| format!("<li>{}</li>", item))
            .collect();
        format!(
            r#"<div class="next-steps"><h4 style="margin: 0 0 10px 0; color: #065f46;">{} {}</h4><ul style="margin: 0; color: #065f46; padding-left: 20px;">{}</ul></div>"#,
            self.icon, self.heading, items
        )
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("{}:", self.heading);
        for item in self.items {
            out.push_str("\n- ");
            out.push_str(item);
        }
        out
    }
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "#f59e0b",
            ApplicationStatus::Shortlisted => "#8b5cf6",
            ApplicationStatus::Accepted => "#10b981",
            ApplicationStatus::Rejected => "#ef4444",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "⏳",
            ApplicationStatus::Shortlisted => "📋",
            ApplicationStatus::Accepted => "🎉",
            ApplicationStatus::Rejected => "💼",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Your application is being reviewed by our team.",
            ApplicationStatus::Shortlisted => {
                "Congratulations! Your application has been shortlisted for further consideration."
            }
            ApplicationStatus::Accepted => {
                "Fantastic news! Your application has been accepted. Welcome to the team!"
            }
            ApplicationStatus::Rejected => {
                "Thank you for your application. While you were not selected for this position, we encourage you to apply for future opportunities."
            }
        }
    }

    pub fn next_steps(self) -> NextSteps {
        match self {
            ApplicationStatus::Pending => NextSteps {
                icon: "📋",
                heading: "What's Next?",
                items: &[
                    "Our team is reviewing your application",
                    "You'll hear from us within 1-2 weeks",
                    "Keep an eye on your email for updates",
                ],
            },
            ApplicationStatus::Shortlisted => NextSteps {
                icon: "🎯",
                heading: "Next Steps",
                items: &[
                    "Prepare for potential interviews",
                    "Review the job description thoroughly",
                    "Research our company and values",
                    "We'll contact you soon with next steps",
                ],
            },
            ApplicationStatus::Accepted => NextSteps {
                icon: "🚀",
                heading: "Welcome Aboard!",
                items: &[
                    "Our HR team will contact you with onboarding details",
                    "Prepare your required documents",
                    "Review your employment contract carefully",
                    "Get ready for an exciting journey with us!",
                ],
            },
            ApplicationStatus::Rejected => NextSteps {
                icon: "💪",
                heading: "Keep Going!",
                items: &[
                    "Don't get discouraged - every application is valuable experience",
                    "Consider applying for other positions that match your skills",
                    "Continue developing your skills and portfolio",
                    "We'll keep your profile for future opportunities",
                ],
            },
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid application status: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    Applied,
    Interview,
    Offered,
    Rejected,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Open,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offered,
        JobStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::Applied => "Applied",
            JobStatus::Interview => "Interview",
            JobStatus::Offered => "Offered",
            JobStatus::Rejected => "Rejected",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            JobStatus::Open => "#3b82f6",
            JobStatus::Applied => "#f59e0b",
            JobStatus::Interview => "#8b5cf6",
            JobStatus::Offered => "#10b981",
            JobStatus::Rejected => "#ef4444",
        }
    }

    /// Message for a `from -> to` transition; unlisted pairs get the generic one.
    pub fn transition_message(from: JobStatus, to: JobStatus) -> &'static str {
        use JobStatus::*;
        match (from, to) {
            (Open, Applied) => "Great start! Your application is now in the pipeline.",
            (Applied, Interview) => "Excellent! You got an interview. Time to prepare!",
            (Interview, Offered) => "Amazing news! You received a job offer!",
            (Interview, Rejected) => "Keep your head up! Every interview is a learning experience.",
            (Applied, Rejected) => "Don't get discouraged. Keep applying!",
            _ => GENERIC_TRANSITION_MESSAGE,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid job status: {}", s)))
    }
}

// Lenient lookups over stored strings.

pub fn application_color(raw: &str) -> &'static str {
    raw.parse::<ApplicationStatus>()
        .map(ApplicationStatus::color)
        .unwrap_or(NEUTRAL_COLOR)
}

pub fn application_icon(raw: &str) -> &'static str {
    raw.parse::<ApplicationStatus>()
        .map(ApplicationStatus::icon)
        .unwrap_or(NEUTRAL_ICON)
}

pub fn application_message(raw: &str) -> &'static str {
    raw.parse::<ApplicationStatus>()
        .map(ApplicationStatus::message)
        .unwrap_or(GENERIC_APPLICATION_MESSAGE)
}

pub fn application_next_steps_html(raw: &str) -> String {
    raw.parse::<ApplicationStatus>()
        .map(|status| status.next_steps().to_html())
        .unwrap_or_default()
}

pub fn application_next_steps_text(raw: &str) -> String {
    raw.parse::<ApplicationStatus>()
        .map(|status| status.next_steps().to_text())
        .unwrap_or_else(|_| GENERIC_NEXT_STEPS_TEXT.to_string())
}

pub fn job_color(raw: &str) -> &'static str {
    raw.parse::<JobStatus>()
        .map(JobStatus::color)
        .unwrap_or(NEUTRAL_COLOR)
}

pub fn job_transition_message(from: &str, to: &str) -> &'static str {
    match (from.parse::<JobStatus>(), to.parse::<JobStatus>()) {
        (Ok(from), Ok(to)) => JobStatus::transition_message(from, to),
        _ => GENERIC_TRANSITION_MESSAGE,
    }
}
