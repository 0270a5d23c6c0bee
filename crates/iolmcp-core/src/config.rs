//! Application configuration management.
//!
//! Configuration is read once at startup from environment variables
//! (a `.env` file is loaded by the binary before this runs). Only the
//! credentials are required; everything else has a default.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use crate::auth::Credentials;

/// Application name used for the default log directory
const APP_NAME: &str = "iolmcp";

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.invertironline.com";

/// Subtracted from the server-declared token lifetime so renewal happens
/// before the server starts rejecting the token.
pub const DEFAULT_TOKEN_MARGIN_SECS: i64 = 300;

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_USERNAME: &str = "IOL_USERNAME";
pub const ENV_PASSWORD: &str = "IOL_PASSWORD";
pub const ENV_BASE_URL: &str = "IOL_BASE_URL";
pub const ENV_TOKEN_MARGIN: &str = "IOL_TOKEN_MARGIN_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "IOL_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG_DIR: &str = "IOL_LOG_DIR";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Could not determine a log directory; set IOL_LOG_DIR")]
    NoLogDir,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: String,
    pub token_margin: Duration,
    pub request_timeout: std::time::Duration,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let username = get(ENV_USERNAME).ok_or(ConfigError::Missing(ENV_USERNAME))?;
        let password = get(ENV_PASSWORD).ok_or(ConfigError::Missing(ENV_PASSWORD))?;

        let base_url = get(ENV_BASE_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let margin_secs = match get(ENV_TOKEN_MARGIN) {
            Some(raw) => parse_number::<i64>(ENV_TOKEN_MARGIN, &raw)?,
            None => DEFAULT_TOKEN_MARGIN_SECS,
        };
        let token_margin = Some(margin_secs)
            .filter(|secs| *secs >= 0)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| ConfigError::Invalid {
                name: ENV_TOKEN_MARGIN,
                value: margin_secs.to_string(),
            })?;

        let timeout_secs = match get(ENV_REQUEST_TIMEOUT) {
            Some(raw) => parse_number::<u64>(ENV_REQUEST_TIMEOUT, &raw)?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            credentials: Credentials::new(username, password),
            base_url,
            token_margin,
            request_timeout: std::time::Duration::from_secs(timeout_secs),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Directory for the log file, falling back to the user cache directory
    pub fn log_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref dir) = self.log_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoLogDir)?;
        Ok(cache_dir.join(APP_NAME))
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup(&[
            (ENV_USERNAME, "trader"),
            (ENV_PASSWORD, "s3cret"),
        ]))
        .expect("config should load");

        assert_eq!(config.credentials.username(), "trader");
        assert_eq!(config.credentials.password(), "s3cret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_margin, Duration::minutes(5));
        assert_eq!(config.request_timeout, std::time::Duration::from_secs(30));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_missing_credentials() {
        let err = Config::from_lookup(lookup(&[(ENV_PASSWORD, "s3cret")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_USERNAME));

        let err = Config::from_lookup(lookup(&[(ENV_USERNAME, "trader")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_PASSWORD));

        // Blank values count as missing
        let err = Config::from_lookup(lookup(&[
            (ENV_USERNAME, "   "),
            (ENV_PASSWORD, "s3cret"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_USERNAME));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_USERNAME, "trader"),
            (ENV_PASSWORD, "s3cret"),
            (ENV_BASE_URL, "http://localhost:9000/"),
            (ENV_TOKEN_MARGIN, "60"),
            (ENV_REQUEST_TIMEOUT, "5"),
            (ENV_LOG_DIR, "/tmp/iol-logs"),
        ]))
        .expect("config should load");

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.token_margin, Duration::seconds(60));
        assert_eq!(config.request_timeout, std::time::Duration::from_secs(5));
        assert_eq!(config.log_dir().unwrap(), PathBuf::from("/tmp/iol-logs"));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = Config::from_lookup(lookup(&[
            (ENV_USERNAME, "trader"),
            (ENV_PASSWORD, "s3cret"),
            (ENV_TOKEN_MARGIN, "five minutes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_TOKEN_MARGIN, .. }));

        let err = Config::from_lookup(lookup(&[
            (ENV_USERNAME, "trader"),
            (ENV_PASSWORD, "s3cret"),
            (ENV_TOKEN_MARGIN, "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_TOKEN_MARGIN, .. }));

        // Parses as i64 but exceeds what a chrono Duration can hold
        let err = Config::from_lookup(lookup(&[
            (ENV_USERNAME, "trader"),
            (ENV_PASSWORD, "s3cret"),
            (ENV_TOKEN_MARGIN, "9223372036854775807"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: ENV_TOKEN_MARGIN,
                value: "9223372036854775807".to_string(),
            }
        );
    }
}
