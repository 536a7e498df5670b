//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{path::PathBuf, time::Duration};

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default account list path
pub const DEFAULT_USERS_PATH: &str = "/users";

/// Default location of the persisted token and preferences
pub const DEFAULT_STORAGE_PATH: &str = ".campus_records.json";

/// Complete client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL, e.g. `http://localhost:5000/api`
    pub api_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Path of the account list endpoint relative to `api_url`. Updates,
    /// deletes and the export always use `/users/:id` and `/users/export`.
    pub users_path: String,
    /// File backing durable storage
    pub storage_path: PathBuf,
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub users_path: Option<String>,
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            users_path: DEFAULT_USERS_PATH.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values from CLI flags
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let api_url = overrides
            .api_url
            .or_else(|| std::env::var("CAMPUS_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => secs,
            None => parse_env("CAMPUS_REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let users_path = overrides
            .users_path
            .or_else(|| std::env::var("CAMPUS_USERS_PATH").ok())
            .unwrap_or_else(|| DEFAULT_USERS_PATH.to_string());

        let storage_path = overrides
            .storage_path
            .or_else(|| std::env::var_os("CAMPUS_STORAGE_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH));

        let config = ClientConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
            users_path,
            storage_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "CAMPUS_API_URL".to_string(),
                reason: format!("Must be an http(s) URL, got '{}'", self.api_url),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "CAMPUS_REQUEST_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !self.users_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                var: "CAMPUS_USERS_PATH".to_string(),
                reason: format!("Must start with '/', got '{}'", self.users_path),
            });
        }

        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "CAMPUS_STORAGE_PATH".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Cannot parse '{raw}'"),
            }),
        Err(_) => Ok(None),
    }
}
