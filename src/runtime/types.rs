// ABOUTME: Runtime endpoint definitions for Docker and Podman.
// ABOUTME: Includes RuntimeType, the resolved endpoint and override config.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

impl FromStr for RuntimeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(RuntimeType::Docker),
            "podman" => Ok(RuntimeType::Podman),
            other => Err(format!(
                "unknown runtime '{}' (expected docker or podman)",
                other
            )),
        }
    }
}

/// A runtime socket to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEndpoint {
    pub runtime_type: RuntimeType,
    pub socket_path: String,
}

/// Explicit runtime override; unset fields fall back to detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub runtime: Option<RuntimeType>,
    pub socket: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_type_parses_case_insensitively() {
        assert_eq!("Docker".parse::<RuntimeType>(), Ok(RuntimeType::Docker));
        assert_eq!(" podman ".parse::<RuntimeType>(), Ok(RuntimeType::Podman));
        assert!("containerd".parse::<RuntimeType>().is_err());
    }
}
