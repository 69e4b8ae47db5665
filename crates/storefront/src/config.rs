//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Supabase project URL (e.g., <https://xyz.supabase.co>)
//! - `SUPABASE_ANON_KEY` - Supabase anon key used for PostgREST requests
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `WHATSAPP_NUMBER` - Destination for order messages, international
//!   format without "+" (default: the shop's number)
//! - `CATALOG_CACHE_PATH` - Catalog snapshot file (default: .cache/catalog.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive).
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Supabase backend configuration
    pub supabase: SupabaseConfig,
    /// WhatsApp number that receives order messages
    pub whatsapp_number: String,
    /// Where the catalog snapshot cache is stored
    pub catalog_cache_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Supabase connection configuration.
///
/// Implements `Debug` manually to redact the anon key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., <https://xyz.supabase.co>)
    pub url: String,
    /// Anon key sent as `apikey` and bearer token
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the anon key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

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

        let supabase = SupabaseConfig::from_env()?;
        let whatsapp_number = get_env_or_default("WHATSAPP_NUMBER", "584145828186");
        let catalog_cache_path =
            PathBuf::from(get_env_or_default("CATALOG_CACHE_PATH", ".cache/catalog.json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            supabase,
            whatsapp_number,
            catalog_cache_path,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SupabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("SUPABASE_URL")?;
        url::Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;

        let anon_key = get_required_env("SUPABASE_ANON_KEY")?;
        validate_secret_strength(&anon_key, "SUPABASE_ANON_KEY")?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: SecretString::from(anon_key),
        })
    }

    /// Base URL of the PostgREST endpoint.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Expose the anon key for request headers.
    #[must_use]
    pub fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reject secrets that look like unconfigured placeholders.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            supabase: SupabaseConfig {
                url: "https://abc.supabase.co".to_string(),
                anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.anon"),
            },
            whatsapp_number: "584145828186".to_string(),
            catalog_cache_path: PathBuf::from(".cache/catalog.json"),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-anon-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("eyJhbGciOiJIUzI1NiJ9.k3y", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = sample_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_rest_url() {
        assert_eq!(
            sample_config().supabase.rest_url(),
            "https://abc.supabase.co/rest/v1"
        );
    }

    #[test]
    fn test_supabase_config_debug_redacts_anon_key() {
        let config = sample_config();
        let debug_output = format!("{:?}", config.supabase);

        assert!(debug_output.contains("abc.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("eyJhbGciOiJIUzI1NiJ9.anon"));
    }
}
