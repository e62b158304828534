// ABOUTME: Resource usage snapshots of the runtime gateway.
// ABOUTME: Typed subset of the daemon's stats document.

use crate::types::ContainerId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait StatsOps: Send + Sync {
    /// One non-streaming usage snapshot of a container.
    async fn usage_snapshot(&self, id: &ContainerId) -> Result<UsageSnapshot, StatsError>;
}

/// The parts of the daemon's stats document the manager reads.
///
/// Field names follow the daemon's JSON schema, so a raw stats document
/// deserializes directly into this type. `precpu_stats` holds the counters
/// of the previous sample taken by the daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    #[serde(default)]
    pub memory_stats: MemoryStats,
    #[serde(default)]
    pub cpu_stats: CpuStats,
    #[serde(default)]
    pub precpu_stats: CpuStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub usage: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuStats {
    pub cpu_usage: Option<CpuUsage>,
    pub system_cpu_usage: Option<u64>,
    pub online_cpus: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuUsage {
    pub total_usage: Option<u64>,
}

impl CpuStats {
    pub fn total_usage(&self) -> Option<u64> {
        self.cpu_usage.as_ref().and_then(|u| u.total_usage)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("stats stream ended without a sample: {0}")]
    NoSample(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
