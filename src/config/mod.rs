// ABOUTME: Configuration types and parsing for dockhand.yml.
// ABOUTME: Handles YAML parsing, discovery and environment overrides.

use crate::error::{Error, Result};
use crate::manager::CleanupPolicy;
use crate::runtime::{RuntimeConfig, RuntimeType};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "dockhand.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockhand.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockhand/config.yml";

pub const ENV_RUNTIME: &str = "DOCKHAND_RUNTIME";
pub const ENV_SOCKET: &str = "DOCKHAND_SOCKET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Explicit runtime type; detected when absent.
    #[serde(default)]
    pub runtime: Option<RuntimeType>,

    /// Explicit socket path.
    #[serde(default)]
    pub socket: Option<String>,

    /// Client request timeout.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default)]
    pub cleanup: CleanupPolicy,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            runtime: None,
            socket: None,
            timeout: default_timeout(),
            cleanup: CleanupPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Discovered configuration, or the defaults when there is no file.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply `DOCKHAND_RUNTIME` and `DOCKHAND_SOCKET`; empty values are ignored.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(runtime) = env_value(ENV_RUNTIME) {
            self.runtime = Some(
                runtime
                    .parse()
                    .map_err(|e| Error::InvalidConfig(format!("{}: {}", ENV_RUNTIME, e)))?,
            );
        }

        if let Some(socket) = env_value(ENV_SOCKET) {
            self.socket = Some(socket);
        }

        Ok(self)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            runtime: self.runtime,
            socket: self.socket.clone(),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
