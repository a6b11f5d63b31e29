//! Configuration Management
//!
//! Endpoint and credential settings for the janitor. Values are layered
//! CLI > environment > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::ibmcloud::auth::DEFAULT_API_KEY_ENV;

/// Public IAM endpoint
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.cloud.ibm.com/";

/// Overrides the IAM endpoint
pub const IAM_ENDPOINT_ENV: &str = "IBMCLOUD_IAM_ENDPOINT";

/// Overrides the PowerVS endpoint
pub const POWER_ENDPOINT_ENV: &str = "IBMCLOUD_POWER_ENDPOINT";

/// HTTP timeout used when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Janitor configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// IAM endpoint for token exchange and API key lookups
    #[serde(default)]
    pub iam_endpoint: Option<String>,
    /// PowerVS endpoint; derived from the lease region when unset
    #[serde(default)]
    pub power_endpoint: Option<String>,
    /// Environment variable holding the janitor's API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Parse an endpoint so that relative joins append to its path
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("Invalid endpoint {:?}", raw))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("powervs-janitor").join("config.json"))
    }

    /// Load configuration from the default location, then apply the environment
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Environment variables take precedence over the file
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(IAM_ENDPOINT_ENV) {
            if !value.trim().is_empty() {
                self.iam_endpoint = Some(value);
            }
        }
        if let Ok(value) = std::env::var(POWER_ENDPOINT_ENV) {
            if !value.trim().is_empty() {
                self.power_endpoint = Some(value);
            }
        }
    }

    /// Get effective IAM endpoint
    pub fn effective_iam_endpoint(&self) -> Result<Url> {
        parse_endpoint(self.iam_endpoint.as_deref().unwrap_or(DEFAULT_IAM_ENDPOINT))
    }

    /// Get effective PowerVS endpoint, `None` means per-region
    pub fn effective_power_endpoint(&self) -> Result<Option<Url>> {
        self.power_endpoint
            .as_deref()
            .map(parse_endpoint)
            .transpose()
    }

    /// Get effective API key variable name
    pub fn effective_api_key_env(&self) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string())
    }

    /// Get effective HTTP timeout
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
