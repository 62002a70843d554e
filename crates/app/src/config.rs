//! Application configuration.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MERCADO_API_URL` / `MERCADO_TIMEOUT_SECS` - see the client crate
//! - `MERCADO_DATA_DIR` - where the session store file lives
//!   (default: the platform data dir, e.g. `~/.local/share/mercado-barrio`)

use std::path::PathBuf;

use thiserror::Error;

use mercado_barrio_client::{ApiConfig, ConfigError};
use mercado_barrio_core::image::UrlScheme;

/// Directory name used under the platform data dir.
const APP_DIR: &str = "mercado-barrio";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error(transparent)]
    Api(#[from] ConfigError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gateway connection settings.
    pub api: ApiConfig,
    /// Directory holding persisted client state.
    pub data_dir: PathBuf,
    /// Scheme used to absolutize protocol-relative image references,
    /// derived from the API base.
    pub scheme: UrlScheme,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppConfigError` if the API configuration is invalid.
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::resolve(None)
    }

    /// Load configuration, letting `api_base_override` win over the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `AppConfigError` if the API configuration is invalid.
    pub fn resolve(api_base_override: Option<&str>) -> Result<Self, AppConfigError> {
        let api = ApiConfig::resolve(api_base_override)?;

        let data_dir = std::env::var("MERCADO_DATA_DIR").map_or_else(
            |_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_DIR)
            },
            PathBuf::from,
        );

        let scheme = scheme_of(&api.base_url);

        Ok(Self {
            api,
            data_dir,
            scheme,
        })
    }

    /// The session store file.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

/// Scheme of a base URL, defaulting to https for anything unexpected.
fn scheme_of(base_url: &str) -> UrlScheme {
    if base_url
        .get(..7)
        .is_some_and(|p| p.eq_ignore_ascii_case("http://"))
    {
        UrlScheme::Http
    } else {
        UrlScheme::Https
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_follows_api_base() {
        assert_eq!(scheme_of("http://localhost:5000"), UrlScheme::Http);
        assert_eq!(scheme_of("https://api.example.test"), UrlScheme::Https);
        assert_eq!(scheme_of("ftp://weird"), UrlScheme::Https);
    }

    #[test]
    fn test_session_file_lives_under_data_dir() {
        let config = AppConfig {
            api: ApiConfig::with_base("http://localhost:5000").unwrap(),
            data_dir: PathBuf::from("/tmp/mb-test"),
            scheme: UrlScheme::Http,
        };
        assert_eq!(
            config.session_file(),
            PathBuf::from("/tmp/mb-test/session.json")
        );
    }
}
