//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATFORM_API_URL` - Base URL of the TechMart platform API
//! - `PAYMENT_GATEWAY_URL` - Base URL of the card-payment gateway
//! - `PAYMENT_GATEWAY_KEY` - Gateway API key (min 20 chars, no placeholders)
//!
//! ## Optional
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 3000)
//! - `SHOP_BASE_URL` - Public URL for the shop (default: `http://localhost:3000`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_GATEWAY_KEY_LENGTH: usize = 20;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shop application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the shop
    pub base_url: String,
    /// Base URL of the TechMart platform API (orders, payment intents)
    pub platform_api_url: String,
    /// Card-payment gateway configuration
    pub gateway: PaymentGatewayConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Card-payment gateway configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PaymentGatewayConfig {
    /// Gateway base URL
    pub api_url: String,
    /// Gateway API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for PaymentGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGatewayConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the gateway key fails placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = optional_var("SHOP_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_HOST".to_owned(), e.to_string()))?;

        let port = optional_var("SHOP_PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_PORT".to_owned(), e.to_string()))?;

        let base_url = optional_var("SHOP_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_owned());
        validate_url("SHOP_BASE_URL", &base_url)?;

        let platform_api_url = require_var("PLATFORM_API_URL")?;
        validate_url("PLATFORM_API_URL", &platform_api_url)?;

        let gateway_url = require_var("PAYMENT_GATEWAY_URL")?;
        validate_url("PAYMENT_GATEWAY_URL", &gateway_url)?;

        let gateway_key = require_var("PAYMENT_GATEWAY_KEY")?;
        validate_secret("PAYMENT_GATEWAY_KEY", &gateway_key)?;

        Ok(Self {
            host,
            port,
            base_url,
            platform_api_url,
            gateway: PaymentGatewayConfig {
                api_url: gateway_url,
                api_key: SecretString::from(gateway_key),
            },
            sentry_dsn: optional_var("SENTRY_DSN"),
            sentry_environment: optional_var("SENTRY_ENVIRONMENT"),
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the shop is served over HTTPS (controls secure cookies).
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

/// Reject secrets that are too short or look like placeholders.
pub(crate) fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_GATEWAY_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("must be at least {MIN_GATEWAY_KEY_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("contains placeholder pattern '{pattern}'"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_rejects_short_keys() {
        assert!(validate_secret("KEY", "short").is_err());
    }

    #[test]
    fn test_validate_secret_rejects_placeholders() {
        assert!(validate_secret("KEY", "your-gateway-key-here-12345").is_err());
        assert!(validate_secret("KEY", "changeme-changeme-changeme").is_err());
    }

    #[test]
    fn test_validate_secret_accepts_real_looking_keys() {
        assert!(validate_secret("KEY", "gk_live_9f8a7b6c5d4e3f2a1b0c").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("URL", "http://localhost:5000").is_ok());
        assert!(validate_url("URL", "not a url").is_err());
    }

    #[test]
    fn test_gateway_config_debug_redacts_key() {
        let config = PaymentGatewayConfig {
            api_url: "https://gateway.test".to_owned(),
            api_key: SecretString::from("gk_live_9f8a7b6c5d4e3f2a1b0c".to_owned()),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("gk_live"));
    }
}
