//! Client configuration.
//!
//! Values come from the environment (a `.env` file is loaded by the binary
//! first) and can be overridden by command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Base URL of the admin backend.
pub const ENV_API_URL: &str = "SHOP_ADMIN_API_URL";
/// Login entry point users are redirected to.
pub const ENV_LOGIN_URL: &str = "SHOP_ADMIN_LOGIN_URL";
/// Whole-request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SHOP_ADMIN_TIMEOUT_SECS";
/// Connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "SHOP_ADMIN_CONNECT_TIMEOUT_SECS";
/// Session file location for the file token store.
pub const ENV_TOKEN_FILE: &str = "SHOP_ADMIN_TOKEN_FILE";

const DEFAULT_API_URL: &str = "http://localhost";
const DEFAULT_LOGIN_URL: &str = "login.html";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),
    #[error("Invalid value for {name}: '{value}' is not a whole number of seconds")]
    InvalidNumber { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin, without trailing slash.
    pub base_url: String,
    /// Where unauthenticated users are sent.
    pub login_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Session file; `None` means the platform default.
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            token_file: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Build a config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = normalize_base_url(&url)?;
        }
        if let Some(login) = lookup(ENV_LOGIN_URL).filter(|v| !v.trim().is_empty()) {
            config.login_url = login;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout = parse_secs(ENV_TIMEOUT_SECS, &secs)?;
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT_SECS) {
            config.connect_timeout = parse_secs(ENV_CONNECT_TIMEOUT_SECS, &secs)?;
        }
        config.token_file = lookup(ENV_TOKEN_FILE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_secs(name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidNumber {
            name: name.to_string(),
            value: value.to_string(),
        })
}
