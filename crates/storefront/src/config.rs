//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TRAY_HOST` - Bind address (default: 127.0.0.1)
//! - `TRAY_PORT` - Listen port (default: 3000)
//! - `TRAY_DATA_DIR` - Directory for persisted cart/wishlist files (default: data)
//! - `TRAY_CATALOG_URL` - Catalog API base URL (default: <https://fakestoreapi.com>)
//! - `TRAY_CATALOG_CACHE_TTL_SECS` - Product list cache lifetime (default: 300)
//! - `TRAY_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding `cart.json` and `wishlist.json`
    pub data_dir: PathBuf,
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; products are fetched from `{base_url}/products`
    pub base_url: Url,
    /// How long a fetched product list is served from cache
    pub cache_ttl: Duration,
}

/// Log output format for the `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines for local development.
    #[default]
    Text,
    /// One JSON object per event for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
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
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("TRAY_HOST", "127.0.0.1", str::parse::<IpAddr>)?;
        let port = env.parse_or("TRAY_PORT", "3000", str::parse::<u16>)?;
        let data_dir = PathBuf::from(env.get_or("TRAY_DATA_DIR", "data"));
        let catalog = CatalogConfig::from_lookup(&env)?;
        let log_format = env.parse_or("TRAY_LOG_FORMAT", "text", str::parse::<LogFormat>)?;

        Ok(Self {
            host,
            port,
            data_dir,
            catalog,
            log_format,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_lookup(env: &Env<'_>) -> Result<Self, ConfigError> {
        let base_url = env.parse_or("TRAY_CATALOG_URL", DEFAULT_CATALOG_URL, parse_http_url)?;
        let ttl_secs = env.parse_or("TRAY_CATALOG_CACHE_TTL_SECS", "300", str::parse::<u64>)?;

        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with defaults and parsing.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get and parse a variable, falling back to `default` when unset.
    fn parse_or<T, E: std::fmt::Display>(
        &self,
        key: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<T, ConfigError> {
        let raw = self.get_or(key, default);
        parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse an absolute `http` or `https` URL.
fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.catalog.base_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TRAY_HOST", "0.0.0.0"),
            ("TRAY_PORT", "8080"),
            ("TRAY_DATA_DIR", "/var/lib/tray"),
            ("TRAY_CATALOG_URL", "http://localhost:9000/api"),
            ("TRAY_CATALOG_CACHE_TTL_SECS", "0"),
            ("TRAY_LOG_FORMAT", "JSON"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tray"));
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:9000/api");
        assert_eq!(config.catalog.cache_ttl, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_empty_value_uses_default() {
        let config = load(&[("TRAY_PORT", ""), ("SENTRY_DSN", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("TRAY_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TRAY_PORT"));
    }

    #[test]
    fn test_invalid_log_format() {
        let err = load(&[("TRAY_LOG_FORMAT", "yaml")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TRAY_LOG_FORMAT"));
    }

    #[test]
    fn test_invalid_catalog_url() {
        assert!(load(&[("TRAY_CATALOG_URL", "not a url")]).is_err());

        let err = load(&[("TRAY_CATALOG_URL", "ftp://example.com")]).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }
}
