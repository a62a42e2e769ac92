//! Configuration file handling for the kongsync CLI
//!
//! Manages loading and saving CLI configuration from ~/.kongsync/config.toml
//! and resolving the admin URL and timeout from multiple sources.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::client::DEFAULT_ADMIN_URL;

/// Environment variable consulted for the admin URL
pub const ADMIN_URL_ENV: &str = "KONGSYNC_ADMIN_URL";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// CLI configuration stored in ~/.kongsync/config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the gateway admin API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.kongsync/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".kongsync");
        path.push("config.toml");

        Ok(path)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load configuration from a specific path; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Resolve the admin URL from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --admin-url command line flag
/// 2. ~/.kongsync/config.toml
/// 3. KONGSYNC_ADMIN_URL environment variable
/// 4. Default: http://127.0.0.1:8001
pub fn resolve_admin_url(admin_url_flag: Option<String>, config: &CliConfig) -> String {
    if let Some(url) = admin_url_flag {
        debug!("Using admin URL from --admin-url flag: {}", url);
        return url;
    }

    if let Some(url) = config.admin_url.as_ref().filter(|url| !url.is_empty()) {
        debug!("Using admin URL from config file: {}", url);
        return url.clone();
    }

    if let Ok(url) = std::env::var(ADMIN_URL_ENV) {
        if !url.is_empty() {
            debug!("Using admin URL from {} environment variable: {}", ADMIN_URL_ENV, url);
            return url;
        }
    }

    debug!("Using default admin URL: {}", DEFAULT_ADMIN_URL);
    DEFAULT_ADMIN_URL.to_string()
}

/// Resolve the timeout from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --timeout command line flag
/// 2. ~/.kongsync/config.toml
/// 3. Default: 30 seconds
pub fn resolve_timeout(timeout_flag: Option<u64>, config: &CliConfig) -> u64 {
    if let Some(timeout) = timeout_flag {
        debug!("Using timeout from --timeout flag: {} seconds", timeout);
        return timeout;
    }

    if let Some(timeout) = config.timeout {
        debug!("Using timeout from config file: {} seconds", timeout);
        return timeout;
    }

    debug!("Using default timeout: {} seconds", DEFAULT_TIMEOUT);
    DEFAULT_TIMEOUT
}
