use std::{path::PathBuf, str::FromStr};

use crate::server::error::config::ConfigError;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MEDIA_STORAGE_PATH: &str = "./uploads";
pub const DEFAULT_MEDIA_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_INVITATION_TTL_HOURS: i64 = 168;
/// One year
pub const MAX_INVITATION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Shared secret used by the authentication provider to sign HS256 access tokens
    pub auth_jwt_secret: String,
    /// Expected `aud` claim, audience is not validated when unset
    pub auth_jwt_audience: Option<String>,
    /// Email allowed to create the first admin account while no users exist
    pub bootstrap_admin_email: Option<String>,
    pub media_storage_path: PathBuf,
    pub media_max_upload_bytes: usize,
    pub invitation_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL", env("DATABASE_URL"))?,
            listen_addr: env("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            auth_jwt_secret: required("AUTH_JWT_SECRET", env("AUTH_JWT_SECRET"))?,
            auth_jwt_audience: env("AUTH_JWT_AUDIENCE"),
            bootstrap_admin_email: env("BOOTSTRAP_ADMIN_EMAIL")
                .map(|email| email.trim().to_lowercase()),
            media_storage_path: env("MEDIA_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_STORAGE_PATH)),
            media_max_upload_bytes: parse_or(
                "MEDIA_MAX_UPLOAD_BYTES",
                env("MEDIA_MAX_UPLOAD_BYTES"),
                DEFAULT_MEDIA_MAX_UPLOAD_BYTES,
            )?,
            invitation_ttl_hours: ttl_hours(
                "INVITATION_TTL_HOURS",
                parse_or(
                    "INVITATION_TTL_HOURS",
                    env("INVITATION_TTL_HOURS"),
                    DEFAULT_INVITATION_TTL_HOURS,
                )?,
            )?,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Configuration accepting tokens signed by the test fixtures
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            auth_jwt_secret: roost_test_utils::constant::TEST_JWT_SECRET.to_string(),
            auth_jwt_audience: Some(roost_test_utils::constant::TEST_JWT_AUDIENCE.to_string()),
            bootstrap_admin_email: Some("admin@example.com".to_string()),
            media_storage_path: PathBuf::from(DEFAULT_MEDIA_STORAGE_PATH),
            media_max_upload_bytes: DEFAULT_MEDIA_MAX_UPLOAD_BYTES,
            invitation_ttl_hours: DEFAULT_INVITATION_TTL_HOURS,
        }
    }
}

/// Reads an environment variable, treating blank values as unset
fn env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

fn required(var: &str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn parse_or<T>(var: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Accepts a positive hour count up to [`MAX_INVITATION_TTL_HOURS`] that chrono can represent
fn ttl_hours(var: &str, hours: i64) -> Result<i64, ConfigError> {
    let in_range = (1..=MAX_INVITATION_TTL_HOURS).contains(&hours)
        && chrono::TimeDelta::try_hours(hours).is_some();
    if !in_range {
        return Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!(
                "expected between 1 and {} hours, got {}",
                MAX_INVITATION_TTL_HOURS, hours
            ),
        });
    }

    Ok(hours)
}
