//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_CONSOLE_API_URL` - Base URL of the shop backend (e.g. `https://api.shop.example`)
//!
//! ## Optional
//! - `SHOP_CONSOLE_SESSION_FILE` - JSON file holding the persisted session
//!   (token + cached admin profile). In-memory when unset.
//! - `SHOP_CONSOLE_LOGIN_ROUTE` - Login entry point used for 401 redirects (default: `/login`)
//! - `SHOP_CONSOLE_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SHOP_CONSOLE_SUCCESS_NOTICE_MS` - Success notice lifetime (default: 3000)
//! - `SHOP_CONSOLE_ERROR_NOTICE_MS` - Error notice lifetime (default: 5000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_LOGIN_ROUTE: &str = "/login";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SUCCESS_NOTICE_MS: u64 = 3_000;
const DEFAULT_ERROR_NOTICE_MS: u64 = 5_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How long transient notices stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeDurations {
    /// Lifetime of success notices.
    pub success: Duration,
    /// Lifetime of error notices.
    pub error: Duration,
}

impl Default for NoticeDurations {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(DEFAULT_SUCCESS_NOTICE_MS),
            error: Duration::from_millis(DEFAULT_ERROR_NOTICE_MS),
        }
    }
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL; endpoint paths are appended to it.
    pub api_base_url: Url,
    /// Session file, `None` for an in-memory session.
    pub session_file: Option<PathBuf>,
    /// Route the console navigates to when the session ends.
    pub login_route: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Notice lifetimes.
    pub notices: NoticeDurations,
}

impl ConsoleConfig {
    /// Configuration with defaults for everything but the backend URL.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            session_file: None,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            notices: NoticeDurations::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("SHOP_CONSOLE_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOP_CONSOLE_API_URL".to_string()))?;
        let api_base_url = Url::parse(raw_url.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOP_CONSOLE_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOP_CONSOLE_API_URL".to_string(),
                format!("unsupported scheme '{}'", api_base_url.scheme()),
            ));
        }

        let mut config = Self::new(api_base_url);
        config.session_file = lookup("SHOP_CONSOLE_SESSION_FILE").map(PathBuf::from);

        if let Some(route) = lookup("SHOP_CONSOLE_LOGIN_ROUTE") {
            if !route.starts_with('/') {
                return Err(ConfigError::InvalidEnvVar(
                    "SHOP_CONSOLE_LOGIN_ROUTE".to_string(),
                    "must start with '/'".to_string(),
                ));
            }
            config.login_route = route;
        }

        if let Some(secs) = parse_u64(&lookup, "SHOP_CONSOLE_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_u64(&lookup, "SHOP_CONSOLE_SUCCESS_NOTICE_MS")? {
            config.notices.success = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "SHOP_CONSOLE_ERROR_NOTICE_MS")? {
            config.notices.error = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u64>, ConfigError> {
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ConsoleConfig::from_lookup(lookup_from(&[("SHOP_CONSOLE_API_URL", "http://localhost:5000")]))
                .unwrap();
        assert_eq!(config.login_route, "/login");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.notices.success, Duration::from_secs(3));
        assert_eq!(config.notices.error, Duration::from_secs(5));
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_missing_url() {
        let err = ConsoleConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "SHOP_CONSOLE_API_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let err = ConsoleConfig::from_lookup(lookup_from(&[("SHOP_CONSOLE_API_URL", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));

        let err = ConsoleConfig::from_lookup(lookup_from(&[
            ("SHOP_CONSOLE_API_URL", "https://api.example.com"),
            ("SHOP_CONSOLE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "SHOP_CONSOLE_TIMEOUT_SECS"));

        let err = ConsoleConfig::from_lookup(lookup_from(&[
            ("SHOP_CONSOLE_API_URL", "https://api.example.com"),
            ("SHOP_CONSOLE_LOGIN_ROUTE", "login"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            ("SHOP_CONSOLE_API_URL", "https://api.example.com/"),
            ("SHOP_CONSOLE_SESSION_FILE", "/tmp/session.json"),
            ("SHOP_CONSOLE_LOGIN_ROUTE", "/admin/login"),
            ("SHOP_CONSOLE_ERROR_NOTICE_MS", "8000"),
        ]))
        .unwrap();
        assert_eq!(config.login_route, "/admin/login");
        assert_eq!(config.notices.error, Duration::from_secs(8));
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }
}
