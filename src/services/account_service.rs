use tracing::info;
use uuid::Uuid;

use crate::dto::auth_dto::{
    LoginPayload, LoginResponse, RegisterPayload, ResetPasswordPayload, UpdateProfilePayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::{Role, TokenKeys};
use crate::models::user::{NewUser, ProfileChanges, User};
use crate::repositories::Repositories;
use crate::services::email_templates;
use crate::services::mailer::Notifier;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::{generate_token, ONE_TIME_TOKEN_LEN};

#[derive(Clone)]
pub struct AccountService {
    repos: Repositories,
    notifier: Notifier,
    tokens: TokenKeys,
    frontend_url: String,
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl AccountService {
    pub fn new(repos: Repositories, notifier: Notifier, tokens: TokenKeys, frontend_url: String) -> Self {
        Self {
            repos,
            notifier,
            tokens,
            frontend_url,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        let email = normalize_email(&payload.email);
        if self.repos.users.find_by_email(&email).await?.is_some() {
            return Err(Error::InvalidInput("User already exists".to_string()));
        }

        let verification_token = generate_token(ONE_TIME_TOKEN_LEN);
        let user = self
            .repos
            .users
            .create(&NewUser {
                name: payload.name.trim().to_string(),
                email,
                password_hash: hash_password(&payload.password)?,
                verification_token: verification_token.clone(),
            })
            .await?;
        info!(user_id = %user.id, "User registered");

        let link = format!("{}/verify?token={}", self.frontend_url, verification_token);
        self.notifier
            .send(&email_templates::welcome(&user.name, &user.email, &link))
            .await;
        Ok(user)
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() || !self.repos.users.verify_email(token).await? {
            return Err(Error::InvalidInput(
                "Invalid or expired verification token".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        let invalid = || Error::Unauthorized("Invalid credentials".to_string());
        let user = self
            .repos
            .users
            .find_by_email(&normalize_email(&payload.email))
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(&payload.password, &user.password_hash) {
            return Err(invalid());
        }
        if !user.is_verified {
            return Err(Error::Forbidden(
                "Please verify your email before logging in".to_string(),
            ));
        }

        let role = if user.is_admin { Role::Admin } else { Role::Applicant };
        let token = self.tokens.issue(user.id, role)?;
        info!(user_id = %user.id, role = role.as_str(), "User logged in");
        Ok(LoginResponse { token, user })
    }

    /// The reset email is the whole point of this call, so a failed send is
    /// reported instead of swallowed.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let user = self
            .repos
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        let token = generate_token(ONE_TIME_TOKEN_LEN);
        self.repos.users.set_reset_token(&user.email, &token).await?;

        let link = format!("{}/reset-password?token={}", self.frontend_url, token);
        let sent = self
            .notifier
            .send(&email_templates::password_reset(&user.name, &user.email, &link))
            .await;
        if !sent {
            return Err(Error::Unavailable("Failed to send reset email".to_string()));
        }
        Ok(())
    }

    pub async fn reset_password(&self, payload: ResetPasswordPayload) -> Result<()> {
        let password_hash = hash_password(&payload.password)?;
        if !self
            .repos
            .users
            .reset_password(&payload.token, &password_hash)
            .await?
        {
            return Err(Error::InvalidInput("Invalid or expired reset token".to_string()));
        }
        Ok(())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<User> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, user_id: Uuid, payload: UpdateProfilePayload) -> Result<User> {
        let changes = ProfileChanges::from(payload);
        self.repos
            .users
            .update_profile(user_id, &changes)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}
