use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{ProfileChanges, User};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordPayload {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Skills arrive either as a JSON list or as one comma separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl SkillsInput {
    /// Trimmed, non-empty entries; `None` when nothing usable is left.
    pub fn into_list(self) -> Option<Vec<String>> {
        let raw = match self {
            SkillsInput::List(items) => items,
            SkillsInput::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        let skills: Vec<String> = raw
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();
        (!skills.is_empty()).then_some(skills)
    }
}

/// Blank strings mean "keep the stored value", same as absent keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub education_level: Option<String>,
    pub education_grade: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    pub experience: Option<String>,
    pub profile_picture: Option<String>,
    pub cv_url: Option<String>,
    pub skills: Option<SkillsInput>,
}

impl From<UpdateProfilePayload> for ProfileChanges {
    fn from(payload: UpdateProfilePayload) -> Self {
        use crate::models::user::non_blank;
        Self {
            name: non_blank(payload.name),
            phone: non_blank(payload.phone),
            bio: non_blank(payload.bio),
            location: non_blank(payload.location),
            education_level: non_blank(payload.education_level),
            education_grade: non_blank(payload.education_grade),
            age: payload.age,
            experience: non_blank(payload.experience),
            profile_picture: non_blank(payload.profile_picture),
            cv_url: non_blank(payload.cv_url),
            skills: payload.skills.and_then(SkillsInput::into_list),
        }
    }
}
