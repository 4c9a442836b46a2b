use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Applicant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Applicant => "applicant",
        }
    }

    /// Anything but an explicit admin claim is an applicant.
    fn from_claim(role: Option<&str>) -> Self {
        match role {
            Some(role) if role.eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::Applicant,
        }
    }
}

/// Verified caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// HS256 signing and verification keys, built once from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + self.ttl).timestamp() as usize,
            role: Some(role.as_str().to_string()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("Token signing failed: {}", e)))
    }

    pub fn authorize(&self, token: &str) -> Result<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;
        let subject_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;
        Ok(Identity {
            subject_id,
            role: Role::from_claim(data.claims.role.as_deref()),
        })
    }

    pub fn authorize_admin(&self, token: &str) -> Result<Identity> {
        let identity = self.authorize(token)?;
        if !identity.is_admin() {
            return Err(Error::Forbidden("forbidden".to_string()));
        }
        Ok(identity)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("missing_authorization".to_string()))?;
    let value = value
        .to_str()
        .map_err(|_| Error::Unauthorized("bad_authorization".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Unauthorized("unsupported_scheme".to_string()))
}

pub async fn require_user(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match bearer_token(req.headers()).and_then(|token| state.tokens.authorize(token)) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match bearer_token(req.headers()).and_then(|token| state.tokens.authorize_admin(token)) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
