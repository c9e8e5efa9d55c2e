//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FARM2HAND_HOST` - Bind address (default: 127.0.0.1)
//! - `FARM2HAND_PORT` - Listen port (default: 3002)
//! - `FARM2HAND_SELLER_NAME` - Name shown in the header (default: เกษตรกรสมชาย)
//! - `FARM2HAND_SEED_FILE` - YAML seed dataset replacing the built-in one
//! - `FARM2HAND_MAX_UPLOAD_BYTES` - Product image upload cap (default: 5 MiB)
//! - `FARM2HAND_STATIC_DIR` - Stylesheet and script directory
//!   (default: crates/dashboard/static)
//! - `FARM2HAND_LOG_JSON` - Emit JSON logs when `true` or `1`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)
//!
//! ## Optional (TLS)
//! - `FARM2HAND_TLS_CERT` - PEM-encoded certificate chain
//! - `FARM2HAND_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_SELLER_NAME: &str = "เกษตรกรสมชาย";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_STATIC_DIR: &str = "crates/dashboard/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Seller shown in the header
    pub seller_name: String,
    /// Seed dataset to load instead of the built-in one
    pub seed_file: Option<PathBuf>,
    /// Largest accepted product form body, image included
    pub max_upload_bytes: usize,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// JSON log output
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (
            get_optional(lookup, "FARM2HAND_TLS_CERT"),
            get_optional(lookup, "FARM2HAND_TLS_KEY"),
        ) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "FARM2HAND_TLS_*".to_string(),
                "Both FARM2HAND_TLS_CERT and FARM2HAND_TLS_KEY must be set together".to_string(),
            )),
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
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or_default(&lookup, "FARM2HAND_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "FARM2HAND_PORT", 3002_u16)?;
        let seller_name = get_optional(&lookup, "FARM2HAND_SELLER_NAME")
            .unwrap_or_else(|| DEFAULT_SELLER_NAME.to_string());
        let seed_file = get_optional(&lookup, "FARM2HAND_SEED_FILE").map(PathBuf::from);
        let max_upload_bytes =
            parse_or_default(&lookup, "FARM2HAND_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "FARM2HAND_MAX_UPLOAD_BYTES".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let static_dir = get_optional(&lookup, "FARM2HAND_STATIC_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);
        let log_json = get_optional(&lookup, "FARM2HAND_LOG_JSON")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        let sentry_dsn = get_optional(&lookup, "SENTRY_DSN");
        let sentry_environment = get_optional(&lookup, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional(&lookup, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional(&lookup, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);
        let tls = TlsConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            seller_name,
            seed_file,
            max_upload_bytes,
            static_dir,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3002,
            seller_name: DEFAULT_SELLER_NAME.to_string(),
            seed_file: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
            tls: None,
        }
    }
}

/// Trimmed, non-empty value of `key`.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional(lookup, key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
