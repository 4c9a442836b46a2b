use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub frontend_url: String,
    pub mail_from: String,
    pub mail_relay_url: Option<String>,
    pub mail_relay_api_key: Option<String>,
    pub mail_dev_relay_url: Option<String>,
    pub public_rps: u32,
    pub allowed_origins: Vec<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            server_address: get("SERVER_ADDRESS")?,
            database_url: get("DATABASE_URL")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", optional("DATABASE_MAX_CONNECTIONS"), 20)?,
            jwt_secret: get("JWT_SECRET")?,
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", optional("JWT_TTL_HOURS"), 24)?,
            frontend_url: optional("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string())
                .trim_end_matches('/')
                .to_string(),
            mail_from: get("MAIL_FROM")?,
            mail_relay_url: optional("MAIL_RELAY_URL"),
            mail_relay_api_key: optional("MAIL_RELAY_API_KEY"),
            mail_dev_relay_url: optional("MAIL_DEV_RELAY_URL"),
            public_rps: parse_or("PUBLIC_RPS", optional("PUBLIC_RPS"), 100)?,
            allowed_origins: optional("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
