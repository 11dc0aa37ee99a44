//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `VITE_API_URL` - API base URL (default: `http://localhost:5000/api`)
//! - `VITE_DEMO_MODE` - `true` to substitute demo data when the backend is down
//! - `VITE_DEBUG` - `true` for debug-level logging
//! - `TAPONN_MERCHANT_UPI_ID` - UPI address shop payments go to (default: `taponn@upi`)
//! - `TAPONN_MERCHANT_NAME` - Payee name shown in UPI apps (default: `TapOnn`)
//! - `TAPONN_STORAGE_DIR` - Directory for persisted client state (default: `.taponn`)

use std::path::PathBuf;
use std::time::Duration;

use taponn_core::Merchant;
use thiserror::Error;
use url::Url;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Timeout for ordinary calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for a single-file upload.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for a multi-file upload.
pub const MULTIPLE_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_MERCHANT_UPI_ID: &str = "taponn@upi";
const DEFAULT_MERCHANT_NAME: &str = "TapOnn";
const DEFAULT_STORAGE_DIR: &str = ".taponn";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL. Always ends with `/` so relative paths join under it.
    pub api_url: Url,
    /// Substitute demo data on network or server failures.
    pub demo_mode: bool,
    /// Verbose logging.
    pub debug: bool,
    /// Payee for shop UPI payments.
    pub merchant: Merchant,
    /// Backing directory for persistent local storage.
    pub storage_dir: PathBuf,
    /// Per-call timeouts.
    pub timeouts: Timeouts,
}

/// Timeouts per call class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub default: Duration,
    pub upload: Duration,
    pub multiple_upload: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default: DEFAULT_TIMEOUT,
            upload: UPLOAD_TIMEOUT,
            multiple_upload: MULTIPLE_UPLOAD_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("VITE_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("VITE_API_URL".to_string(), e))?;
        let demo_mode = get_bool_env("VITE_DEMO_MODE")?;
        let debug = get_bool_env("VITE_DEBUG")?;

        let merchant = Merchant::new(
            get_env_or_default("TAPONN_MERCHANT_UPI_ID", DEFAULT_MERCHANT_UPI_ID),
            get_env_or_default("TAPONN_MERCHANT_NAME", DEFAULT_MERCHANT_NAME),
        );
        if !merchant.upi_id.contains('@') {
            return Err(ConfigError::InvalidEnvVar(
                "TAPONN_MERCHANT_UPI_ID".to_string(),
                format!("'{}' is not a UPI address", merchant.upi_id),
            ));
        }

        let storage_dir = PathBuf::from(get_env_or_default("TAPONN_STORAGE_DIR", DEFAULT_STORAGE_DIR));

        Ok(Self {
            api_url,
            demo_mode,
            debug,
            merchant,
            storage_dir,
            timeouts: Timeouts::default(),
        })
    }

    /// Configuration pointing at `api_url` with defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not absolute.
    pub fn for_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)
                .map_err(|e| ConfigError::InvalidEnvVar("VITE_API_URL".to_string(), e))?,
            demo_mode: false,
            debug: false,
            merchant: Merchant::new(DEFAULT_MERCHANT_UPI_ID, DEFAULT_MERCHANT_NAME),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            timeouts: Timeouts::default(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, forcing a trailing slash so `Url::join` keeps the path.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    let url = Url::parse(&raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("'{raw}' cannot be used as a base URL"));
    }
    Ok(url)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag. Unset means false.
fn get_bool_env(key: &str) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(false),
        Ok(value) => parse_bool(&value)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("expected true/false, got '{value}'"))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
