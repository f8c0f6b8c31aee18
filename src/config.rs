use std::env;
use std::str::FromStr;

use actix_web::http::Uri;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the process environment (after `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Browser origin allowed to call the API cross-site.
    pub client_url: String,
    pub jwt_secret: String,
    pub jwt_expire_days: i64,
    pub bcrypt_cost: u32,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed_or("PORT", 5000)?,
            client_url: origin_or("CLIENT_URL", "http://localhost:3000")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expire_days: parsed_or("JWT_EXPIRE_DAYS", 30)?,
            bcrypt_cost: parsed_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            max_connections: parsed_or("DB_MAX_CONNECTIONS", 5)?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// An origin is `scheme://host[:port]`; a trailing slash is dropped.
fn origin_or(key: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(default.to_string()),
    };
    let origin = value.trim().trim_end_matches('/');
    match origin.parse::<Uri>() {
        Ok(uri) if uri.scheme().is_some() && uri.host().is_some() && uri.path() == "/" => {
            Ok(origin.to_string())
        }
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
