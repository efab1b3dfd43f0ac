//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CURRENCY` - ISO 4217 code reported with every amount (default: INR)
//! - `STOREFRONT_CATALOG_REFRESH_SECS` - Catalog snapshot refresh interval (default: 300, min: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use freshcart_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_CATALOG_REFRESH_SECS: u64 = 300;
const MIN_CATALOG_REFRESH_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Currency tag attached to every reported amount
    pub currency: CurrencyCode,
    /// How often the catalog snapshot is reloaded
    pub catalog_refresh: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
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

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let currency = get_env_or_default("STOREFRONT_CURRENCY", "INR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_CURRENCY".to_string(), e))?;
        let catalog_refresh = parse_refresh_interval(&get_env_or_default(
            "STOREFRONT_CATALOG_REFRESH_SECS",
            &DEFAULT_CATALOG_REFRESH_SECS.to_string(),
        ))?;

        Ok(Self {
            database_url,
            host,
            port,
            currency,
            catalog_refresh,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the catalog refresh interval in seconds, enforcing the minimum.
fn parse_refresh_interval(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar(
            "STOREFRONT_CATALOG_REFRESH_SECS".to_string(),
            e.to_string(),
        )
    })?;
    if secs < MIN_CATALOG_REFRESH_SECS {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_CATALOG_REFRESH_SECS".to_string(),
            format!("must be at least {MIN_CATALOG_REFRESH_SECS} seconds (got {secs})"),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a 0.0-1.0 sample rate.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refresh_interval_default() {
        let interval = parse_refresh_interval("300").unwrap();
        assert_eq!(interval, Duration::from_secs(300));
    }

    #[test]
    fn test_parse_refresh_interval_rejects_too_small() {
        let err = parse_refresh_interval("1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_refresh_interval_rejects_garbage() {
        assert!(parse_refresh_interval("soon").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            currency: CurrencyCode::INR,
            catalog_refresh: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_config_debug_redacts_database_url() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://app:hunter2@db/freshcart"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            currency: CurrencyCode::INR,
            catalog_refresh: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
