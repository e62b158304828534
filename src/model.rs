// ABOUTME: Summary entities handed to callers of the manager.
// ABOUTME: Stable, serializable projections of raw runtime records.

use crate::runtime::ContainerState;
use crate::types::{ContainerId, ImageId, NetworkId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Layout of every timestamp the manager renders.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A container as listed by the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    /// Lifecycle state, reported as running when the health check is healthy.
    pub state: ContainerState,
    pub created: String,
    /// Start time of a running container; empty otherwise.
    pub uptime: String,
    /// First non-empty address across attached networks.
    pub ip: String,
    pub labels: HashMap<String, String>,
}

/// One repository tag of a local image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: ImageId,
    pub name: String,
    pub tag: String,
    pub created: String,
    /// Size in megabytes, e.g. `187.32MB`.
    pub size: String,
}

/// One IPAM pool of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetConfig {
    pub subnet: String,
    pub gateway: String,
}

/// A network with its pools and member containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub id: NetworkId,
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub created: String,
    pub internal: bool,
    pub subnets: Vec<SubnetConfig>,
    /// Container ID to its IPv4 address on this network, CIDR suffix stripped.
    pub containers: HashMap<String, String>,
    pub labels: HashMap<String, String>,
}

/// Version information reported by the runtime daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub docker_version: String,
    pub api_version: String,
    pub min_api_version: String,
    pub git_commit: String,
    pub go_version: String,
    pub os: String,
    pub arch: String,
}

/// A registry search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSearchResult {
    pub name: String,
    pub description: String,
    pub star_count: i64,
    pub official: bool,
}

/// Memory usage of a container at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub percent: f64,
    /// Bytes in use.
    pub used: f64,
    /// Limit in bytes.
    pub limit: f64,
}
