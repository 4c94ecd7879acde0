//! Environment-driven configuration
//!
//! Every setting has a default so the client runs against a local backend
//! without any `.env` file.

use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_KLINE_INTERVAL: &str = "240";
pub const DEFAULT_KLINE_LIMIT: u32 = 100;
/// The backend refuses to return more candles than this.
pub const MAX_KLINE_LIMIT: u32 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 15;

/// Deployment environment name (`APP_ENV`), defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    InvalidUrl { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}: '{}'", key, value)
            }
            ConfigError::InvalidUrl { value, reason } => {
                write!(f, "invalid DASHBOARD_API_URL '{}': {}", value, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_url: Url,
    pub refresh_interval: Duration,
    pub search_debounce: Duration,
    pub kline_interval: String,
    pub kline_limit: u32,
    pub http_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECONDS),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            kline_interval: DEFAULT_KLINE_INTERVAL.to_string(),
            kline_limit: DEFAULT_KLINE_LIMIT,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }
}

impl DashboardConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = match lookup("DASHBOARD_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => defaults.api_url,
        };

        let refresh_secs = parse_number(&lookup, "REFRESH_INTERVAL_SECONDS")?
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECONDS);
        if refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REFRESH_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        let debounce_ms =
            parse_number(&lookup, "SEARCH_DEBOUNCE_MS")?.unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS);
        let timeout_secs = parse_number(&lookup, "HTTP_TIMEOUT_SECONDS")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS);

        let kline_limit = match parse_number(&lookup, "KLINE_LIMIT")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "KLINE_LIMIT",
                    value: "0".to_string(),
                })
            }
            Some(limit) => limit.min(u64::from(MAX_KLINE_LIMIT)) as u32,
            None => defaults.kline_limit,
        };

        let kline_interval = lookup("KLINE_INTERVAL")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.kline_interval);

        Ok(Self {
            api_url,
            refresh_interval: Duration::from_secs(refresh_secs),
            search_debounce: Duration::from_millis(debounce_ms),
            kline_interval,
            kline_limit,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_number<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}
