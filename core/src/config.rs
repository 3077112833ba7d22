//! Client configuration resolved from the environment.

use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "GREENTRADE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "GREENTRADE_API_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "GREENTRADE_API_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "GREENTRADE_API_RETRY_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("GREENTRADE_API_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves the configuration through `lookup`; unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidBaseUrl(url.to_string()));
            }
            config.base_url = normalize_base_url(url);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
            if secs == 0 {
                return Err(ConfigError::InvalidNumber {
                    var: ENV_TIMEOUT_SECS,
                    value: raw,
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_MAX_RETRIES) {
            let retries = parse_number(ENV_MAX_RETRIES, &raw)?;
            config.retry.max_retries = u32::try_from(retries).map_err(|_| ConfigError::InvalidNumber {
                var: ENV_MAX_RETRIES,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = get(ENV_RETRY_DELAY_MS) {
            config.retry.delay = Duration::from_millis(parse_number(ENV_RETRY_DELAY_MS, &raw)?);
        }
        Ok(config)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}
