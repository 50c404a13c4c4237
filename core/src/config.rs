//! Base-address resolution and transport settings.
//!
//! Everything here is decided once, at startup. The resolved values are
//! immutable afterwards and shared by every request the service issues.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::ApiError;

/// Address used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://localhost:7192";

/// Uniform per-request timeout. There is no per-call override.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Externally supplied settings for the remote task API.
#[derive(Debug, Clone, Default)]
pub struct ApiSettings {
    pub base_url: Option<String>,
}

impl ApiSettings {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

/// Deployment environment. Only `Development` relaxes certificate checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    Development,
    #[default]
    Production,
}

impl DeploymentMode {
    pub fn is_development(self) -> bool {
        self == DeploymentMode::Development
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Development => write!(f, "development"),
            DeploymentMode::Production => write!(f, "production"),
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(DeploymentMode::Development),
            "production" | "prod" => Ok(DeploymentMode::Production),
            other => Err(format!(
                "unknown environment {other:?} (expected development or production)"
            )),
        }
    }
}

/// Pick the configured base URL, or fall back to [`DEFAULT_BASE_URL`] with a
/// warning. A trailing `/` is stripped so resource paths join cleanly.
pub fn resolve_base_url(configured: Option<&str>) -> String {
    match configured.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            warn!(fallback = DEFAULT_BASE_URL, "API base URL not configured, using fallback");
            DEFAULT_BASE_URL.to_string()
        }
    }
}

/// Settings the transport client is built from.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl TransportConfig {
    pub fn new(settings: &ApiSettings, mode: DeploymentMode) -> Self {
        Self {
            base_url: resolve_base_url(settings.base_url.as_deref()),
            timeout: REQUEST_TIMEOUT,
            accept_invalid_certs: mode.is_development(),
        }
    }

    /// Reject base addresses reqwest could never reach.
    pub fn validate(&self) -> Result<(), ApiError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ApiError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {scheme}"),
            }),
        }
    }
}
