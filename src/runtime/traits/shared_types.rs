// ABOUTME: Raw runtime records and configuration shared by the gateway traits.
// ABOUTME: ContainerConfig, ContainerRecord, ContainerInfo, ImageRecord, NetworkRecord, etc.

use crate::binding::PortBinding;
use crate::types::{ContainerId, ImageId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Runtime-level configuration for creating a container.
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    pub name: String,
    pub hostname: Option<String>,
    pub image: String,
    pub labels: HashMap<String, String>,
    /// Allocate a TTY and keep stdin open.
    pub tty: bool,
    pub restart_policy: RestartPolicyConfig,
    /// Keys like `80/tcp`.
    pub exposed_ports: Vec<String>,
    /// Host bindings keyed like `exposed_ports`.
    pub port_bindings: BTreeMap<String, Vec<PortBinding>>,
    /// Bind strings, `source:destination:mode`.
    pub binds: Vec<String>,
    pub network_mode: Option<String>,
    /// Overrides the image CMD.
    pub command: Option<Vec<String>>,
}

/// Result of a create call.
#[derive(Debug, Clone)]
pub struct ContainerCreated {
    pub id: ContainerId,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartPolicyConfig {
    No,
    Always,
    #[default]
    UnlessStopped,
    OnFailure { max_retries: Option<u32> },
}

/// A container as returned by a list call.
#[derive(Debug, Clone)]
pub struct ContainerRecord {
    pub id: ContainerId,
    /// Names as the daemon reports them, with a leading `/`.
    pub names: Vec<String>,
    pub image: String,
    pub state: ContainerState,
    /// Unix seconds.
    pub created: i64,
    /// IP address by network name.
    pub networks: BTreeMap<String, String>,
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    /// Primary name without the leading `/`.
    pub fn name(&self) -> &str {
        self.names
            .first()
            .map(|n| n.trim_start_matches('/'))
            .unwrap_or_default()
    }
}

/// Inspect details of one container the listing does not carry.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub id: ContainerId,
    /// Health status, when a health check is configured.
    pub health: Option<HealthState>,
    /// RFC 3339 start time.
    pub started_at: Option<String>,
}

/// Lifecycle state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

impl ContainerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
        }
    }

    /// Map the daemon's state string. Unknown states count as exited.
    pub fn from_runtime(state: &str) -> Self {
        match state {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "dead" => ContainerState::Dead,
            "exited" => ContainerState::Exited,
            other => {
                tracing::debug!(state = %other, "unknown container state, treating as exited");
                ContainerState::Exited
            }
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Starting,
    Healthy,
    Unhealthy,
    None,
}

/// A local image as returned by a list call.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: ImageId,
    /// `name:tag` strings; empty for untagged images.
    pub repo_tags: Vec<String>,
    /// Unix seconds.
    pub created: i64,
    /// Bytes.
    pub size: i64,
}

/// A single image as returned by inspect.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub id: ImageId,
    pub repo_tags: Vec<String>,
    /// RFC 3339 creation time.
    pub created: String,
    pub size: i64,
}

/// A network as returned by list or inspect.
#[derive(Debug, Clone, Default)]
pub struct NetworkRecord {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
    /// RFC 3339 creation time.
    pub created: String,
    pub internal: bool,
    pub ipam_pools: Vec<IpamPool>,
    /// Member endpoints by container ID.
    pub containers: HashMap<String, NetworkMember>,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct IpamPool {
    pub subnet: String,
    pub gateway: String,
}

#[derive(Debug, Clone, Default)]
pub struct NetworkMember {
    pub name: String,
    /// Address in CIDR form, e.g. `172.20.0.5/24`.
    pub ipv4_address: String,
}

/// Configuration for creating a network.
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    pub name: String,
    /// Network driver (bridge, overlay, ...); the daemon default when `None`.
    pub driver: Option<String>,
    pub subnet: Option<String>,
    pub gateway: Option<String>,
    pub labels: HashMap<String, String>,
    pub internal: bool,
    pub attachable: bool,
}

/// Version details of the runtime daemon.
#[derive(Debug, Clone, Default)]
pub struct RuntimeMetadata {
    pub version: String,
    pub api_version: String,
    pub min_api_version: String,
    pub git_commit: String,
    pub go_version: String,
    pub os: String,
    pub arch: String,
}
