use std::env;
use std::fmt;

use chrono::Duration;

use crate::auth::token::TokenSettings;

const DEV_ACCESS_SECRET: &str = "super-secret-key";
const DEV_REFRESH_SECRET: &str = "super-refresh-key";

/// Token lifetimes are capped at one year.
const MAX_ACCESS_TTL_MINUTES: i64 = 365 * 24 * 60;
const MAX_REFRESH_TTL_DAYS: i64 = 365;

/// Errors raised while reading configuration at startup.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    Invalid { key: String, value: String },
    /// Access and refresh tokens must be signed with different secrets.
    SharedSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
            ConfigError::SharedSecret => write!(
                f,
                "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// development defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret =
            lookup("ACCESS_TOKEN_SECRET").unwrap_or_else(|| DEV_ACCESS_SECRET.to_string());
        let refresh_secret =
            lookup("REFRESH_TOKEN_SECRET").unwrap_or_else(|| DEV_REFRESH_SECRET.to_string());
        if access_secret == refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        let cors_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => vec![
                "http://localhost:4200".to_string(),
                "http://127.0.0.1:4200".to_string(),
            ],
        };

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8000)?,
            access_secret,
            refresh_secret,
            access_ttl_minutes: parse_ttl(
                &lookup,
                "ACCESS_TOKEN_TTL_MINUTES",
                30,
                MAX_ACCESS_TTL_MINUTES,
            )?,
            refresh_ttl_days: parse_ttl(&lookup, "REFRESH_TOKEN_TTL_DAYS", 7, MAX_REFRESH_TTL_DAYS)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            cors_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    /// True when either signing secret is still the built-in development value.
    pub fn uses_dev_secrets(&self) -> bool {
        self.access_secret == DEV_ACCESS_SECRET || self.refresh_secret == DEV_REFRESH_SECRET
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_ttl: Duration::minutes(self.access_ttl_minutes),
            refresh_ttl: Duration::days(self.refresh_ttl_days),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// Parses a lifetime that must lie in `1..=max`.
fn parse_ttl<F>(lookup: &F, key: &str, default: i64, max: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let ttl = parse_or(lookup, key, default)?;
    if (1..=max).contains(&ttl) {
        Ok(ttl)
    } else {
        Err(ConfigError::Invalid {
            key: key.to_string(),
            value: ttl.to_string(),
        })
    }
}
