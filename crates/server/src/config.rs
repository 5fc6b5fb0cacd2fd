//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODCART_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   the generic `DATABASE_URL`)
//! - `GEOCODER_API_KEY` - API key for the geocoding provider
//!
//! ## Optional
//! - `FOODCART_HOST` - Bind address (default: 127.0.0.1)
//! - `FOODCART_PORT` - Listen port (default: 3000)
//! - `GEOCODER_BASE_URL` - Geocoding endpoint (default: the Yandex geocoder)
//! - `GEOCODER_TIMEOUT_SECS` - Outbound request timeout (default: 10)
//! - `MENU_REQUIRE_AVAILABILITY` - Whether a menu item must be available to
//!   count toward order fulfillment (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default geocoding provider endpoint.
const DEFAULT_GEOCODER_BASE_URL: &str = "https://geocode-maps.yandex.ru/1.x";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// FoodCart application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Geocoding provider configuration
    pub geocoder: GeocoderConfig,
    /// Menu interpretation policy for the order-restaurant resolver
    pub menu: MenuPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Geocoding provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocoderConfig {
    /// Geocoding endpoint URL
    pub base_url: String,
    /// Provider API key
    pub api_key: SecretString,
    /// Outbound request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// How the resolver interprets restaurant menus.
#[derive(Debug, Clone, Copy)]
pub struct MenuPolicy {
    /// When true, a menu item must have `availability = true` for its
    /// restaurant to count toward fulfilling an order.
    pub require_availability: bool,
}

impl Default for MenuPolicy {
    fn default() -> Self {
        Self {
            require_availability: true,
        }
    }
}

impl AppConfig {
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

        let database_url = get_database_url("FOODCART_DATABASE_URL")?;
        let host = get_env_or_default("FOODCART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOODCART_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FOODCART_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOODCART_PORT".to_string(), e.to_string()))?;

        let geocoder = GeocoderConfig::from_env()?;
        let menu = MenuPolicy::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            geocoder,
            menu,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = get_env_or_default("GEOCODER_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GEOCODER_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url: get_env_or_default("GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL),
            api_key: get_required_secret("GEOCODER_API_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl MenuPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("MENU_REQUIRE_AVAILABILITY", "true");
        let require_availability = raw.parse::<bool>().map_err(|e| {
            ConfigError::InvalidEnvVar("MENU_REQUIRE_AVAILABILITY".to_string(), e.to_string())
        })?;

        Ok(Self {
            require_availability,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
