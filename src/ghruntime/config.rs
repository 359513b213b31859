//! # Configuration
//!
//! Two kinds of configuration feed the CLI:
//!
//! - [`RuntimeConfig`]: the per-project `runtime.config.json` that binds a local
//!   directory to a remote app. It is read on demand by the identity resolver and
//!   only ever written by `init`.
//! - [`ClientConfig`]: where the remote API lives and which token to send. It is
//!   read from the environment once per invocation.

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File name probed in the working directory when no app or config is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "runtime.config.json";

const DEFAULT_API_URL: &str = "https://api.github.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Project binding stored in `runtime.config.json`.
///
/// Only `app` is recognized. Unknown keys are ignored and a missing `app`
/// deserializes to an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub app: String,
}

impl RuntimeConfig {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }

    /// Read and parse the config at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| RuntimeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config as pretty JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Connection settings for the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto. Always ends with `/`.
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// `GH_RUNTIME_API_URL` wins over `GH_HOST`. The token comes from `GH_TOKEN`,
    /// then `GITHUB_TOKEN`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = match (get("GH_RUNTIME_API_URL"), get("GH_HOST")) {
            (Some(url), _) => url,
            (None, Some(host)) => api_url_for_host(&host),
            (None, None) => DEFAULT_API_URL.to_string(),
        };

        Self {
            base_url: with_trailing_slash(base_url),
            token: get("GH_TOKEN").or_else(|| get("GITHUB_TOKEN")),
            ..Self::default()
        }
    }
}

fn api_url_for_host(host: &str) -> String {
    let host = host
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if host.eq_ignore_ascii_case("github.com") {
        DEFAULT_API_URL.to_string()
    } else {
        format!("https://{}/api/v3/", host)
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
