//! API client configuration.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MERCADO_API_URL` - Base URL of the marketplace API
//!   (default: `http://localhost:5000`)
//! - `MERCADO_TIMEOUT_SECS` - Per-request timeout in seconds (default: 20)
//!
//! An explicit base passed to [`ApiConfig::resolve`] takes precedence over
//! the environment, which takes precedence over the default - handy for
//! pointing one invocation at an ngrok tunnel without touching `.env`.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Request timeout used when `MERCADO_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL {0}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the marketplace API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API origin, without a trailing slash.
    pub base_url: String,
    /// Total per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured base URL does not parse or
    /// the timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None)
    }

    /// Load configuration, letting `base_override` win over the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the resolved base URL does not parse or the
    /// timeout is not a number.
    pub fn resolve(base_override: Option<&str>) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = base_override
            .map(str::to_owned)
            .or_else(|| std::env::var("MERCADO_API_URL").ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Self::with_base(base_url)
    }

    /// Build a config for an explicit base URL, reading the timeout from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` does not parse or the timeout is
    /// not a number.
    pub fn with_base(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(base_url.clone(), e))?;

        let timeout = match std::env::var("MERCADO_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::InvalidEnvVar(
                        "MERCADO_TIMEOUT_SECS".to_owned(),
                        format!("not a number: {raw}"),
                    )
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_wins() {
        let config = ApiConfig::resolve(Some("http://api.example.test:8080")).unwrap();
        assert_eq!(config.base_url, "http://api.example.test:8080");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ApiConfig::with_base("http://localhost:5000/").unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        let result = ApiConfig::with_base("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_, _))));
    }

    #[test]
    fn test_default_timeout() {
        let config = ApiConfig::with_base(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
