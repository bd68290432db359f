//! Inventory console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATFORM_API_URL` - Base URL of the TechMart platform API
//!
//! ## Optional
//! - `INVENTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `INVENTORY_PORT` - Listen port (default: 3001)
//! - `INVENTORY_BASE_URL` - Public URL (default: `http://localhost:3001`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Inventory console configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the console
    pub base_url: String,
    /// Base URL of the TechMart platform API (products, fuel requests)
    pub platform_api_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl InventoryConfig {
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

        let host = optional_var("INVENTORY_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("INVENTORY_HOST".to_owned(), e.to_string()))?;

        let port = optional_var("INVENTORY_PORT")
            .unwrap_or_else(|| "3001".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("INVENTORY_PORT".to_owned(), e.to_string()))?;

        let base_url = optional_var("INVENTORY_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3001".to_owned());
        validate_url("INVENTORY_BASE_URL", &base_url)?;

        let platform_api_url = require_var("PLATFORM_API_URL")?;
        validate_url("PLATFORM_API_URL", &platform_api_url)?;

        Ok(Self {
            host,
            port,
            base_url,
            platform_api_url,
            sentry_dsn: optional_var("SENTRY_DSN"),
            sentry_environment: optional_var("SENTRY_ENVIRONMENT"),
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the console is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Read a required environment variable.
fn require_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Read an optional environment variable, treating empty values as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Validate that a variable parses as an absolute URL.
fn validate_url(name: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("URL", "http://localhost:5000").is_ok());
        assert!(validate_url("URL", "5000").is_err());
    }
}
