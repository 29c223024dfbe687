//! Configuration for the gradify portal client
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Base URL of the student dossier portal
pub const DEFAULT_BASE_URL: &str = "https://apoweb-te.uae.ac.ma/dossier_etudiant_fs_tetouan";

/// Browser User-Agent the portal expects on login requests
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Portal client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal base URL
    pub base_url: String,

    /// Login form endpoint, relative to the base URL
    pub login_path: String,

    /// Protected grade sheet endpoint, relative to the base URL
    pub grades_path: String,

    /// Per-probe request timeout in seconds
    pub probe_timeout_secs: u64,

    /// Timeout for each of the two finalization requests, in seconds
    pub finalize_timeout_secs: u64,

    /// Upper bound on concurrent probes
    pub worker_bound: usize,

    /// Candidate birth years tried when the caller supplies none,
    /// in priority order
    pub default_years: Vec<i32>,

    /// User-Agent header sent on every request
    pub user_agent: String,

    /// Accept invalid TLS certificates (the portal's chain is broken)
    pub accept_invalid_certs: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: "/check.php".to_string(),
            grades_path: "/note-resultat.php".to_string(),
            probe_timeout_secs: 8,
            finalize_timeout_secs: 10,
            worker_bound: 12,
            default_years: (2001..=2007).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: true,
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("GRADIFY_BASE_URL").unwrap_or(defaults.base_url);
        let login_path = std::env::var("GRADIFY_LOGIN_PATH").unwrap_or(defaults.login_path);
        let grades_path = std::env::var("GRADIFY_GRADES_PATH").unwrap_or(defaults.grades_path);

        let probe_timeout_secs = std::env::var("GRADIFY_PROBE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.probe_timeout_secs);

        let finalize_timeout_secs = std::env::var("GRADIFY_FINALIZE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.finalize_timeout_secs);

        let worker_bound = std::env::var("GRADIFY_WORKERS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.worker_bound);

        let default_years = std::env::var("GRADIFY_YEARS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|y| y.trim().parse::<i32>().ok())
                    .collect::<Vec<_>>()
            })
            .filter(|years| !years.is_empty())
            .unwrap_or(defaults.default_years);

        let user_agent = std::env::var("GRADIFY_USER_AGENT").unwrap_or(defaults.user_agent);

        let accept_invalid_certs = std::env::var("GRADIFY_ACCEPT_INVALID_CERTS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.accept_invalid_certs);

        Ok(Self {
            base_url,
            login_path,
            grades_path,
            probe_timeout_secs,
            finalize_timeout_secs,
            worker_bound,
            default_years,
            user_agent,
            accept_invalid_certs,
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::config(format!("failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base URL {}: {e}", self.base_url)))?;

        if !self.login_path.starts_with('/') || !self.grades_path.starts_with('/') {
            return Err(Error::config("endpoint paths must start with '/'"));
        }

        if self.probe_timeout_secs == 0 || self.finalize_timeout_secs == 0 {
            return Err(Error::config("timeouts must be greater than 0"));
        }

        if self.worker_bound == 0 {
            return Err(Error::config("worker_bound must be greater than 0"));
        }

        if self.default_years.is_empty() {
            return Err(Error::config("default_years must not be empty"));
        }

        for &year in &self.default_years {
            if !(1000..=9999).contains(&year) {
                return Err(Error::config(format!(
                    "year {year} outside the supported 4-digit range"
                )));
            }
        }

        Ok(())
    }

    /// Absolute URL of the login endpoint
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.login_path)
    }

    /// Absolute URL of the grade sheet endpoint
    #[must_use]
    pub fn grades_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.grades_path)
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    #[must_use]
    pub fn finalize_timeout(&self) -> Duration {
        Duration::from_secs(self.finalize_timeout_secs)
    }
}
