use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education_level: Option<String>,
    pub education_grade: Option<String>,
    pub age: Option<i32>,
    pub experience: Option<String>,
    pub cv_url: Option<String>,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn contact(&self) -> UserContact {
        UserContact {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn documents(&self) -> ProfileDocuments {
        ProfileDocuments {
            profile_picture: self.profile_picture.clone(),
            cv_url: self.cv_url.clone(),
        }
    }
}

/// Who a message goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verification_token: String,
}

/// Uploaded-document references carried on the user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProfileDocuments {
    pub profile_picture: Option<String>,
    pub cv_url: Option<String>,
}

impl ProfileDocuments {
    /// Drops blank values so a merge leaves the stored reference untouched.
    pub fn non_blank(self) -> Self {
        Self {
            profile_picture: non_blank(self.profile_picture),
            cv_url: non_blank(self.cv_url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profile_picture.is_none() && self.cv_url.is_none()
    }
}

/// Profile fields an owner may change. `None` means "keep what is stored".
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub education_level: Option<String>,
    pub education_grade: Option<String>,
    pub age: Option<i32>,
    pub experience: Option<String>,
    pub profile_picture: Option<String>,
    pub cv_url: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Coalesce-on-blank: an empty or whitespace-only value counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
