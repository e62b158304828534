// ABOUTME: Network operations of the runtime gateway.
// ABOUTME: List, inspect, create, remove, prune, connect and disconnect.

use super::shared_types::{NetworkConfig, NetworkRecord};
use crate::types::{ContainerId, NetworkId};
use async_trait::async_trait;

#[async_trait]
pub trait NetworkOps: Send + Sync {
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>, NetworkError>;

    /// Inspect a network by ID or name.
    async fn inspect_network(&self, id: &NetworkId) -> Result<NetworkRecord, NetworkError>;

    async fn create_network(&self, config: &NetworkConfig) -> Result<NetworkId, NetworkError>;

    async fn remove_network(&self, id: &NetworkId) -> Result<(), NetworkError>;

    /// Remove every network not used by a container.
    async fn prune_networks(&self) -> Result<(), NetworkError>;

    async fn connect_to_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), NetworkError>;

    async fn disconnect_from_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
        force: bool,
    ) -> Result<(), NetworkError>;
}

/// Errors from network operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("network not found: {0}")]
    NotFound(String),

    #[error("network already exists: {0}")]
    AlreadyExists(String),

    #[error("container already connected: {0}")]
    AlreadyConnected(String),

    #[error("container not connected to network: {0}")]
    NotConnected(String),

    #[error("network in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
