// ABOUTME: Container provisioning: resolve network, parse specs, create, attach, start.
// ABOUTME: Each step names itself in its error; cleanup on failure is opt-in.

use super::Manager;
use super::error::{ManagerError, ManagerErrorKind};
use crate::binding::{PortBinding, SpecError, parse_port_spec, parse_volume_spec};
use crate::runtime::{
    ContainerConfig, ContainerError, NetworkError, RestartPolicyConfig, RuntimeGateway,
};
use crate::types::{ContainerId, NetworkId};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::collections::{BTreeMap, HashMap};

/// What to do with a created container when a later step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPolicy {
    /// Leave it for the caller; the error names it.
    #[default]
    Leave,
    /// Force-remove it, best effort.
    RemoveOnFailure,
}

/// Declarative description of a container to provision.
#[derive(Debug, Clone, Default)]
pub struct ProvisionRequest {
    pub name: String,
    pub image: String,
    /// Network name to run on.
    pub network: String,
    /// Port specs, e.g. `8080:80/tcp`.
    pub ports: Vec<String>,
    /// Volume specs, e.g. `/srv/data:/data:ro`.
    pub volumes: Vec<String>,
    pub labels: HashMap<String, String>,
    pub command: Option<Vec<String>>,
}

impl ProvisionRequest {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            network: network.into(),
            ..Default::default()
        }
    }

    pub fn port(mut self, spec: impl Into<String>) -> Self {
        self.ports.push(spec.into());
        self
    }

    pub fn volume(mut self, spec: impl Into<String>) -> Self {
        self.volumes.push(spec.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn command(mut self, command: Vec<String>) -> Self {
        self.command = Some(command);
        self
    }
}

/// Saga step at which provisioning stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    ResolveNetwork,
    ParsePorts,
    ParseVolumes,
    Create,
    Attach,
    Start,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProvisionError {
    #[snafu(display("resolving network {network}: {source}"))]
    ResolveNetwork {
        network: String,
        source: ManagerError,
    },

    #[snafu(display("parsing port specs: {source}"))]
    PortSpec { source: SpecError },

    #[snafu(display("parsing volume specs: {source}"))]
    VolumeSpec { source: SpecError },

    #[snafu(display("creating container {name}: {source}"))]
    Create {
        name: String,
        source: ContainerError,
    },

    #[snafu(display("attaching container {container} to network {network}: {source}"))]
    Attach {
        container: ContainerId,
        network: String,
        source: NetworkError,
    },

    #[snafu(display("starting container {container}: {source}"))]
    Start {
        container: ContainerId,
        source: ContainerError,
    },
}

impl ProvisionError {
    pub fn step(&self) -> ProvisionStep {
        match self {
            ProvisionError::ResolveNetwork { .. } => ProvisionStep::ResolveNetwork,
            ProvisionError::PortSpec { .. } => ProvisionStep::ParsePorts,
            ProvisionError::VolumeSpec { .. } => ProvisionStep::ParseVolumes,
            ProvisionError::Create { .. } => ProvisionStep::Create,
            ProvisionError::Attach { .. } => ProvisionStep::Attach,
            ProvisionError::Start { .. } => ProvisionStep::Start,
        }
    }

    pub fn kind(&self) -> ManagerErrorKind {
        match self {
            ProvisionError::ResolveNetwork { source, .. } => source.kind(),
            ProvisionError::PortSpec { .. } | ProvisionError::VolumeSpec { .. } => {
                ManagerErrorKind::InvalidSpec
            }
            ProvisionError::Create {
                source: ContainerError::ImageNotFound(_),
                ..
            } => ManagerErrorKind::NotFound,
            ProvisionError::Create { .. }
            | ProvisionError::Attach { .. }
            | ProvisionError::Start { .. } => ManagerErrorKind::Runtime,
        }
    }

    /// The container left behind when a step after creation failed.
    pub fn orphaned_container(&self) -> Option<&ContainerId> {
        match self {
            ProvisionError::Attach { container, .. } | ProvisionError::Start { container, .. } => {
                Some(container)
            }
            _ => None,
        }
    }
}

/// Exposed port keys and the host bindings for each, keyed like `80/tcp`.
///
/// A container-only spec exposes its port without publishing it. A spec
/// naming an address with an empty host port publishes on an ephemeral port.
pub fn port_table(
    specs: &[String],
) -> Result<BTreeMap<String, Vec<PortBinding>>, SpecError> {
    let mut table: BTreeMap<String, Vec<PortBinding>> = BTreeMap::new();
    for spec in specs {
        for binding in parse_port_spec(spec)? {
            let entry = table.entry(binding.port_key()).or_default();
            if binding.published {
                entry.push(binding);
            }
        }
    }
    Ok(table)
}

/// Bind strings `source:destination:mode` for each volume spec.
pub fn bind_strings(specs: &[String]) -> Result<Vec<String>, SpecError> {
    specs
        .iter()
        .map(|spec| parse_volume_spec(spec).map(|v| v.bind_string()))
        .collect()
}

/// Runtime configuration for a request running on `network`.
pub fn container_config(
    request: &ProvisionRequest,
    network: &str,
    port_bindings: BTreeMap<String, Vec<PortBinding>>,
    binds: Vec<String>,
) -> ContainerConfig {
    ContainerConfig {
        name: request.name.clone(),
        hostname: Some(request.name.clone()),
        image: request.image.clone(),
        labels: request.labels.clone(),
        tty: true,
        restart_policy: RestartPolicyConfig::Always,
        exposed_ports: port_bindings.keys().cloned().collect(),
        port_bindings,
        binds,
        network_mode: Some(network.to_string()),
        command: request.command.clone(),
    }
}

impl<R: RuntimeGateway> Manager<R> {
    /// Provision a running container attached to the requested network.
    ///
    /// Dropping the future between create and start leaves the container
    /// created but not started.
    pub async fn create_container(
        &self,
        request: &ProvisionRequest,
    ) -> Result<ContainerId, ProvisionError> {
        tracing::info!(
            container = %request.name,
            image = %request.image,
            network = %request.network,
            "provisioning container"
        );

        let network = self
            .network_by_name(&request.network)
            .await
            .context(ResolveNetworkSnafu {
                network: request.network.clone(),
            })?;
        let network_id = network.id;
        tracing::debug!(network = %request.network, id = %network_id.short(), "resolved network");

        let port_bindings = port_table(&request.ports).context(PortSpecSnafu)?;
        let binds = bind_strings(&request.volumes).context(VolumeSpecSnafu)?;

        let config = container_config(request, &request.network, port_bindings, binds);
        let created = self
            .runtime()
            .create_container(&config)
            .await
            .context(CreateSnafu {
                name: request.name.clone(),
            })?;
        for warning in &created.warnings {
            tracing::warn!(container = %request.name, "create warning: {}", warning);
        }
        let id = created.id;
        tracing::debug!(container = %id.short(), "created container");

        if let Err(e) = self.attach(&id, &network_id).await {
            self.clean_up(&id).await;
            return Err(e).context(AttachSnafu {
                container: id.clone(),
                network: request.network.clone(),
            });
        }

        if let Err(e) = self.runtime().start_container(&id).await {
            self.clean_up(&id).await;
            return Err(e).context(StartSnafu { container: id.clone() });
        }

        tracing::info!(container = %id.short(), name = %request.name, "container started");
        Ok(id)
    }

    async fn attach(&self, id: &ContainerId, network: &NetworkId) -> Result<(), NetworkError> {
        match self.runtime().connect_to_network(id, network).await {
            Ok(()) => Ok(()),
            Err(NetworkError::AlreadyConnected(message)) => {
                tracing::debug!(container = %id.short(), "already attached: {}", message);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn clean_up(&self, id: &ContainerId) {
        if self.cleanup_policy() != CleanupPolicy::RemoveOnFailure {
            return;
        }
        match self.runtime().remove_container(id, true).await {
            Ok(()) => tracing::info!(container = %id.short(), "removed partially provisioned container"),
            Err(e) => tracing::warn!(
                container = %id.short(),
                error = %e,
                "failed to remove partially provisioned container"
            ),
        }
    }
}
