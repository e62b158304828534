// ABOUTME: Network operations of the manager facade.
// ABOUTME: Listing, lookups, creation, pruning and container membership.

use super::Manager;
use super::error::{ManagerError, Resource};
use super::translate;
use crate::model::NetworkSummary;
use crate::runtime::{NetworkConfig, RuntimeGateway};
use crate::types::{ContainerId, NetworkId};
use std::collections::HashMap;

impl<R: RuntimeGateway> Manager<R> {
    pub async fn list_networks(&self) -> Result<Vec<NetworkSummary>, ManagerError> {
        let records = self
            .runtime
            .list_networks()
            .await
            .map_err(ManagerError::network("list networks", "*"))?;

        Ok(records.into_iter().map(translate::network_summary).collect())
    }

    /// Whether a network with exactly this name exists.
    pub async fn network_exists(&self, name: &str) -> Result<bool, ManagerError> {
        let records = self
            .runtime
            .list_networks()
            .await
            .map_err(ManagerError::network("list networks", name))?;

        Ok(records.iter().any(|record| record.name == name))
    }

    /// Create an attachable, non-internal network with one IPAM pool.
    ///
    /// Empty strings leave the driver, subnet or gateway to the daemon.
    pub async fn create_network(
        &self,
        name: &str,
        driver: &str,
        subnet: &str,
        gateway: &str,
        labels: HashMap<String, String>,
    ) -> Result<NetworkId, ManagerError> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let config = NetworkConfig {
            name: name.to_string(),
            driver: non_empty(driver),
            subnet: non_empty(subnet),
            gateway: non_empty(gateway),
            labels,
            internal: false,
            attachable: true,
        };

        tracing::info!(network = %name, driver = %driver, subnet = %subnet, "creating network");
        self.runtime
            .create_network(&config)
            .await
            .map_err(ManagerError::network("create network", name))
    }

    pub async fn network_by_name(&self, name: &str) -> Result<NetworkSummary, ManagerError> {
        self.list_networks()
            .await?
            .into_iter()
            .find(|network| network.name == name)
            .ok_or_else(|| ManagerError::not_found(Resource::Network, name))
    }

    pub async fn network_by_id(&self, id: &NetworkId) -> Result<NetworkSummary, ManagerError> {
        let record = self
            .runtime
            .inspect_network(id)
            .await
            .map_err(ManagerError::network("inspect network", id))?;
        Ok(translate::network_summary(record))
    }

    pub async fn delete_network(&self, id: &NetworkId) -> Result<(), ManagerError> {
        tracing::info!(network = %id, "removing network");
        self.runtime
            .remove_network(id)
            .await
            .map_err(ManagerError::network("remove network", id))
    }

    /// Remove every network no container uses.
    pub async fn prune_networks(&self) -> Result<(), ManagerError> {
        self.runtime
            .prune_networks()
            .await
            .map_err(ManagerError::network("prune networks", "unused"))
    }

    /// Connect a container to a network; both must exist.
    pub async fn join_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), ManagerError> {
        self.ensure_member_pair(container, network).await?;
        tracing::debug!(container = %container, network = %network, "joining network");
        self.runtime
            .connect_to_network(container, network)
            .await
            .map_err(ManagerError::network("join network", network))
    }

    /// Force-disconnect a container from a network; both must exist.
    pub async fn leave_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), ManagerError> {
        self.ensure_member_pair(container, network).await?;
        tracing::debug!(container = %container, network = %network, "leaving network");
        self.runtime
            .disconnect_from_network(container, network, true)
            .await
            .map_err(ManagerError::network("leave network", network))
    }

    async fn ensure_member_pair(
        &self,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), ManagerError> {
        self.runtime
            .inspect_network(network)
            .await
            .map_err(ManagerError::network("inspect network", network))?;
        self.runtime
            .inspect_container(container)
            .await
            .map_err(ManagerError::container("inspect container", container))?;
        Ok(())
    }
}
