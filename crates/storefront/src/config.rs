//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `MARKETHUB_SITE` - Site namespace for persisted state (default: detrend)
//! - `MARKETHUB_CATALOG_URL` - Product listing endpoint (default: <https://fakestoreapi.com/products>)
//! - `MARKETHUB_CATALOG_LIMIT` - Number of products to request, 1-100 (default: 8)
//! - `MARKETHUB_CATALOG_TIMEOUT_SECS` - HTTP timeout for the listing request (default: 10)
//! - `MARKETHUB_CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `MARKETHUB_STATE_DIR` - Directory for the file-backed store (default: .markethub)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::store::Namespace;

const DEFAULT_SITE: &str = "detrend";
const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";
const DEFAULT_CATALOG_LIMIT: u16 = 8;
const MAX_CATALOG_LIMIT: u16 = 100;
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 2000;
const DEFAULT_STATE_DIR: &str = ".markethub";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Namespace prefixing every persisted key
    pub site: Namespace,
    /// Product listing endpoint configuration
    pub catalog: CatalogConfig,
    /// How long the simulated checkout spends "processing"
    pub checkout_delay: Duration,
    /// Directory used by the file-backed store
    pub state_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Product listing endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Listing URL, without the `limit` parameter. Checked by
    /// [`StorefrontConfig::from_lookup`], parsed again by the client.
    pub endpoint: String,
    /// Number of products requested
    pub limit: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_URL.to_string(),
            limit: DEFAULT_CATALOG_LIMIT,
            timeout_secs: DEFAULT_CATALOG_TIMEOUT_SECS,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            site: Namespace::new(DEFAULT_SITE),
            catalog: CatalogConfig::default(),
            checkout_delay: Duration::from_millis(DEFAULT_CHECKOUT_DELAY_MS),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for any value that fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let site = env.or_default("MARKETHUB_SITE", DEFAULT_SITE);
        validate_site(&site)?;

        let endpoint = env.or_default("MARKETHUB_CATALOG_URL", DEFAULT_CATALOG_URL);
        Url::parse(&endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("MARKETHUB_CATALOG_URL".to_string(), e.to_string())
        })?;

        let limit = env.parsed("MARKETHUB_CATALOG_LIMIT", DEFAULT_CATALOG_LIMIT)?;
        if !(1..=MAX_CATALOG_LIMIT).contains(&limit) {
            return Err(ConfigError::InvalidEnvVar(
                "MARKETHUB_CATALOG_LIMIT".to_string(),
                format!("must be between 1 and {MAX_CATALOG_LIMIT}"),
            ));
        }

        let timeout_secs = env.parsed(
            "MARKETHUB_CATALOG_TIMEOUT_SECS",
            DEFAULT_CATALOG_TIMEOUT_SECS,
        )?;
        let checkout_delay_ms =
            env.parsed("MARKETHUB_CHECKOUT_DELAY_MS", DEFAULT_CHECKOUT_DELAY_MS)?;
        let state_dir = PathBuf::from(env.or_default("MARKETHUB_STATE_DIR", DEFAULT_STATE_DIR));
        let sentry_dsn = env.optional("SENTRY_DSN");

        Ok(Self {
            site: Namespace::new(site),
            catalog: CatalogConfig {
                endpoint,
                limit,
                timeout_secs,
            },
            checkout_delay: Duration::from_millis(checkout_delay_ms),
            state_dir,
            sentry_dsn,
        })
    }
}

/// Site names become storage key prefixes, so keep them to plain identifiers.
fn validate_site(site: &str) -> Result<(), ConfigError> {
    if site.is_empty() || !site.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidEnvVar(
            "MARKETHUB_SITE".to_string(),
            "must be non-empty ASCII letters and digits".to_string(),
        ));
    }
    Ok(())
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.site.as_str(), "detrend");
        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.catalog.limit, 8);
        assert_eq!(config.checkout_delay, Duration::from_millis(2000));
        assert_eq!(config.state_dir, PathBuf::from(".markethub"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("MARKETHUB_SITE", "marvillyon"),
            ("MARKETHUB_CATALOG_URL", "http://localhost:9000/products"),
            ("MARKETHUB_CATALOG_LIMIT", "20"),
            ("MARKETHUB_CHECKOUT_DELAY_MS", "0"),
            ("MARKETHUB_STATE_DIR", "/tmp/state"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        assert_eq!(config.site.as_str(), "marvillyon");
        assert_eq!(config.catalog.endpoint, "http://localhost:9000/products");
        assert_eq!(config.catalog.limit, 20);
        assert_eq!(config.checkout_delay, Duration::ZERO);
        assert_eq!(config.state_dir, PathBuf::from("/tmp/state"));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = from_pairs(&[("MARKETHUB_SITE", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.site.as_str(), "detrend");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_site() {
        let err = from_pairs(&[("MARKETHUB_SITE", "my site")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MARKETHUB_SITE"));
    }

    #[test]
    fn test_invalid_url() {
        let err = from_pairs(&[("MARKETHUB_CATALOG_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().contains("MARKETHUB_CATALOG_URL"));
    }

    #[test]
    fn test_default_endpoint_parses() {
        let endpoint = CatalogConfig::default().endpoint;
        assert_eq!(Url::parse(&endpoint).unwrap().host_str(), Some("fakestoreapi.com"));
    }

    #[test]
    fn test_invalid_config_is_an_app_error() {
        let config_err = from_pairs(&[("MARKETHUB_CATALOG_LIMIT", "0")]).unwrap_err();
        let err = crate::AppError::from(config_err);
        assert!(matches!(err, crate::AppError::Config(_)));
        assert_eq!(err.notification().message, "The store is misconfigured");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(from_pairs(&[("MARKETHUB_CATALOG_LIMIT", "0")]).is_err());
        assert!(from_pairs(&[("MARKETHUB_CATALOG_LIMIT", "101")]).is_err());
        assert!(from_pairs(&[("MARKETHUB_CATALOG_LIMIT", "eight")]).is_err());
        assert!(from_pairs(&[("MARKETHUB_CATALOG_LIMIT", "100")]).is_ok());
    }
}
