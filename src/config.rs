//! Configuration management for the VAP MCP proxy
//!
//! Configuration is read once at startup from environment variables and is
//! never mutated afterwards. Every setting has a current name (`VAP_*`) and
//! a legacy name (`VAPE_*`); the current name wins whenever it is set.

use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default tool-protocol endpoint (`/initialize`, `/tools/call`, ...)
pub const DEFAULT_API_URL: &str = "https://api.vapagent.com/mcp";

/// Default task and billing endpoint (`/v3/tasks`, ...)
pub const DEFAULT_API_BASE_URL: &str = "https://api.vapagent.com";

/// Default port for the HTTP transport
pub const DEFAULT_PORT: u16 = 8000;

/// Timeout for POSTs to the tool-protocol endpoint
pub const MCP_POST_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for task-creation POSTs
pub const TASK_POST_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for task-status GETs
pub const TASK_GET_TIMEOUT: Duration = Duration::from_secs(30);

/// Proxy configuration
///
/// Holds the remote endpoints, credentials, and the debug toggle. Built with
/// [`Config::from_env`] in the binary and [`Config::from_lookup`] in tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Bearer token for the remote API; `None` when not configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the tool-protocol endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the task and billing endpoint
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Enables debug-level logging
    #[serde(default)]
    pub debug: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            api_base_url: default_api_base_url(),
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Returns
    ///
    /// Returns the loaded configuration. Absent variables fall back to
    /// defaults; this never fails.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of a variable by name, or `None`
    ///
    /// # Examples
    ///
    /// ```
    /// use vap_mcp_proxy::config::Config;
    ///
    /// let config = Config::from_lookup(|name| match name {
    ///     "VAP_API_KEY" => Some("vap_test".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.api_key.as_deref(), Some("vap_test"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |current: &str, legacy: &str| lookup(current).or_else(|| lookup(legacy));

        let api_key = get("VAP_API_KEY", "VAPE_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let api_url = get("VAP_API_URL", "VAPE_API_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or_else(default_api_url);

        let api_base_url = get("VAP_API_BASE_URL", "VAPE_API_BASE_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or_else(default_api_base_url);

        let debug = get("VAP_DEBUG", "VAPE_DEBUG").is_some_and(|value| !value.is_empty());

        Self {
            api_key,
            api_url,
            api_base_url,
            debug,
        }
    }

    /// Whether a bearer token will be attached to remote calls
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if either base URL is not an absolute
    /// `http` or `https` URL.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("api_url", &self.api_url)?;
        validate_base_url("api_base_url", &self.api_base_url)?;
        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        ProxyError::Config(format!("{} is not a valid URL ({}): {}", field, value, e))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProxyError::Config(format!(
            "{} must use http or https, got scheme '{}'",
            field, other
        ))
        .into()),
    }
}
