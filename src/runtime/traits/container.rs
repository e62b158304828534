// ABOUTME: Container operations of the runtime gateway.
// ABOUTME: Create, start, stop, restart, remove, inspect, list, rename and copy.

use super::shared_types::{ContainerConfig, ContainerCreated, ContainerInfo, ContainerRecord};
use crate::types::ContainerId;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Create a container; the response carries any daemon warnings.
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerCreated, ContainerError>;

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop a running container. `None` uses the daemon's default grace period.
    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Option<Duration>,
    ) -> Result<(), ContainerError>;

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;

    /// Detailed state of one container, including health and start time.
    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError>;

    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerRecord>, ContainerError>;

    async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ContainerError>;

    /// Extract a tar archive into `dest_dir` inside the container.
    async fn upload_archive(
        &self,
        id: &ContainerId,
        dest_dir: &str,
        archive: Bytes,
    ) -> Result<(), ContainerError>;
}

/// Filters for listing containers.
#[derive(Debug, Clone, Default)]
pub struct ContainerFilters {
    /// Filter by label (key=value).
    pub labels: HashMap<String, String>,
    /// Filter by name (partial match).
    pub name: Option<String>,
    /// Include stopped containers.
    pub all: bool,
}

impl ContainerFilters {
    /// Every container, running or not.
    pub fn all() -> Self {
        Self {
            all: true,
            ..Default::default()
        }
    }
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("container not running: {0}")]
    NotRunning(String),

    #[error("container already running: {0}")]
    AlreadyRunning(String),

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
