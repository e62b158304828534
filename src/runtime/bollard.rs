// ABOUTME: Bollard-based runtime gateway implementation.
// ABOUTME: Talks to Docker or Podman through the Docker-compatible API.

use crate::model::ImageSearchResult;
use crate::runtime::traits::{
    ArchiveStream, ContainerConfig, ContainerCreated, ContainerError, ContainerFilters,
    ContainerInfo, ContainerOps, ContainerRecord, ContainerState, ExportStream, HealthState,
    ImageError, ImageInfo, ImageOps, ImageRecord, IpamPool, LogError, LogLine, LogLineStream,
    LogOps, LogOptions, LogStream, NetworkConfig, NetworkError, NetworkMember, NetworkOps,
    NetworkRecord, ProgressStream, RestartPolicyConfig, RuntimeInfo, RuntimeInfoError,
    RuntimeMetadata, StatsError, StatsOps, UsageSnapshot,
};
use crate::runtime::types::{RuntimeEndpoint, RuntimeType};
use crate::types::{ContainerId, ImageId, NetworkId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{
    ContainerCreateBody, EndpointSettings, HostConfig, Ipam, IpamConfig, NetworkConnectRequest,
    NetworkCreateRequest, NetworkDisconnectRequest, PortBinding, RestartPolicy,
    RestartPolicyNameEnum,
};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ImportImageOptions, InspectContainerOptions,
    InspectNetworkOptions, ListContainersOptions, ListImagesOptions, ListNetworksOptions,
    LogsOptions, PruneImagesOptions, PruneNetworksOptions, RemoveContainerOptions,
    RemoveImageOptions, RenameContainerOptions, RestartContainerOptions, SearchImagesOptions,
    StartContainerOptions, StatsOptions, StopContainerOptions, TagImageOptions,
    UploadToContainerOptions,
};
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn status_of(e: &bollard::errors::Error) -> Option<(u16, &str)> {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => Some((*status_code, message.as_str())),
        _ => None,
    }
}

fn map_container_create_error(e: bollard::errors::Error) -> ContainerError {
    match status_of(&e) {
        Some((404, message)) => ContainerError::ImageNotFound(message.to_string()),
        Some((409, message)) => ContainerError::AlreadyExists(message.to_string()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_start_error(e: bollard::errors::Error) -> ContainerError {
    match status_of(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        Some((304, message)) => ContainerError::AlreadyRunning(message.to_string()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_stop_error(e: bollard::errors::Error) -> ContainerError {
    match status_of(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        Some((304, message)) => ContainerError::NotRunning(message.to_string()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_not_found_error(e: bollard::errors::Error) -> ContainerError {
    match status_of(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_rename_error(e: bollard::errors::Error) -> ContainerError {
    match status_of(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        Some((409, message)) => ContainerError::AlreadyExists(message.to_string()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_image_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match status_of(&e) {
        Some((404, _)) => ImageError::NotFound(image_name.to_string()),
        Some((409, message)) => ImageError::InUse(format!("{}: {}", image_name, message)),
        _ => ImageError::Runtime(format!("{}: {}", image_name, e)),
    }
}

fn map_network_create_error(e: bollard::errors::Error) -> NetworkError {
    match status_of(&e) {
        Some((409, message)) => NetworkError::AlreadyExists(message.to_string()),
        _ => NetworkError::Runtime(e.to_string()),
    }
}

fn map_network_not_found_error(e: bollard::errors::Error) -> NetworkError {
    match status_of(&e) {
        Some((404, message)) => NetworkError::NotFound(message.to_string()),
        _ => NetworkError::Runtime(e.to_string()),
    }
}

fn map_network_remove_error(e: bollard::errors::Error) -> NetworkError {
    match status_of(&e) {
        Some((404, message)) => NetworkError::NotFound(message.to_string()),
        Some((403, message)) => NetworkError::InUse(message.to_string()),
        _ => NetworkError::Runtime(e.to_string()),
    }
}

fn map_network_connect_error(e: bollard::errors::Error) -> NetworkError {
    match status_of(&e) {
        Some((404, message)) => NetworkError::NotFound(message.to_string()),
        // Docker answers 403 "endpoint ... already exists", Podman 409/500
        // "already connected".
        Some((_, message))
            if message.contains("already exists") || message.contains("already connected") =>
        {
            NetworkError::AlreadyConnected(message.to_string())
        }
        _ => NetworkError::Runtime(e.to_string()),
    }
}

fn map_network_disconnect_error(e: bollard::errors::Error) -> NetworkError {
    match status_of(&e) {
        Some((404, message)) => NetworkError::NotFound(message.to_string()),
        Some((403, message)) => NetworkError::NotConnected(message.to_string()),
        _ => NetworkError::Runtime(e.to_string()),
    }
}

fn map_stats_error(e: bollard::errors::Error) -> StatsError {
    match status_of(&e) {
        Some((404, message)) => StatsError::ContainerNotFound(message.to_string()),
        _ => StatsError::Runtime(e.to_string()),
    }
}

// =============================================================================
// Record Conversion
// =============================================================================

// bollard 0.20 returns `Network` from list (no container membership; Docker's
// list endpoint does not report it) and `NetworkInspect` from inspect.
fn network_summary_record(network: bollard::models::Network) -> NetworkRecord {
    network_record(bollard::models::NetworkInspect {
        name: network.name,
        id: network.id,
        created: network.created,
        scope: network.scope,
        driver: network.driver,
        enable_ipv4: network.enable_ipv4,
        enable_ipv6: network.enable_ipv6,
        ipam: network.ipam,
        internal: network.internal,
        attachable: network.attachable,
        ingress: network.ingress,
        config_from: network.config_from,
        config_only: network.config_only,
        options: network.options,
        labels: network.labels,
        ..Default::default()
    })
}

fn network_record(network: bollard::models::NetworkInspect) -> NetworkRecord {
    let ipam_pools = network
        .ipam
        .and_then(|ipam| ipam.config)
        .unwrap_or_default()
        .into_iter()
        .map(|pool| IpamPool {
            subnet: pool.subnet.unwrap_or_default(),
            gateway: pool.gateway.unwrap_or_default(),
        })
        .collect();

    let containers = network
        .containers
        .unwrap_or_default()
        .into_iter()
        .map(|(id, member)| {
            (
                id,
                NetworkMember {
                    name: member.name.unwrap_or_default(),
                    ipv4_address: member.ipv4_address.unwrap_or_default(),
                },
            )
        })
        .collect();

    NetworkRecord {
        id: network.id.unwrap_or_default(),
        name: network.name.unwrap_or_default(),
        driver: network.driver.unwrap_or_default(),
        scope: network.scope.unwrap_or_default(),
        created: network.created.map(|c| c.to_string()).unwrap_or_default(),
        internal: network.internal.unwrap_or(false),
        ipam_pools,
        containers,
        labels: network.labels.unwrap_or_default(),
    }
}

fn restart_policy(policy: RestartPolicyConfig) -> RestartPolicy {
    let (name, maximum_retry_count) = match policy {
        RestartPolicyConfig::No => (RestartPolicyNameEnum::NO, None),
        RestartPolicyConfig::Always => (RestartPolicyNameEnum::ALWAYS, None),
        RestartPolicyConfig::UnlessStopped => (RestartPolicyNameEnum::UNLESS_STOPPED, None),
        RestartPolicyConfig::OnFailure { max_retries } => (
            RestartPolicyNameEnum::ON_FAILURE,
            max_retries.map(i64::from),
        ),
    };
    RestartPolicy {
        name: Some(name),
        maximum_retry_count,
    }
}

fn dangling_filter() -> HashMap<String, Vec<String>> {
    HashMap::from([("dangling".to_string(), vec!["true".to_string()])])
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Runtime gateway backed by a bollard client.
///
/// The client is a shared handle; clones and concurrent calls are fine.
#[derive(Clone)]
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardRuntime {
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Connect to the socket of a detected or configured runtime.
    pub fn connect(
        endpoint: &RuntimeEndpoint,
        timeout: Duration,
    ) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &endpoint.socket_path,
            timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client, endpoint.runtime_type))
    }

    /// Connect using `DOCKER_HOST` and friends, falling back to the local socket.
    pub fn connect_from_env() -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_defaults()
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client, RuntimeType::Docker))
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }
}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn version(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let version = self
            .client
            .version()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        Ok(RuntimeMetadata {
            version: version.version.unwrap_or_default(),
            api_version: version.api_version.unwrap_or_default(),
            min_api_version: version.min_api_version.unwrap_or_default(),
            git_commit: version.git_commit.unwrap_or_default(),
            go_version: version.go_version.unwrap_or_default(),
            os: version.os.unwrap_or_default(),
            arch: version.arch.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerCreated, ContainerError> {
        let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = config
            .port_bindings
            .iter()
            .filter(|(_, bindings)| !bindings.is_empty())
            .map(|(key, bindings)| {
                let bindings = bindings
                    .iter()
                    .map(|b| PortBinding {
                        host_ip: Some(b.ip.clone()),
                        host_port: b.host_port.map(|p| p.to_string()),
                    })
                    .collect();
                (key.clone(), Some(bindings))
            })
            .collect();

        let host_config = HostConfig {
            restart_policy: Some(restart_policy(config.restart_policy)),
            port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
            binds: (!config.binds.is_empty()).then(|| config.binds.clone()),
            network_mode: config.network_mode.clone(),
            ..Default::default()
        };

        let body = ContainerCreateBody {
            hostname: config.hostname.clone(),
            image: Some(config.image.clone()),
            labels: (!config.labels.is_empty()).then(|| config.labels.clone()),
            tty: Some(config.tty),
            open_stdin: Some(config.tty),
            cmd: config.command.clone(),
            exposed_ports: (!config.exposed_ports.is_empty())
                .then(|| config.exposed_ports.clone()),
            host_config: Some(host_config),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(config.name.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_create_error)?;

        Ok(ContainerCreated {
            id: ContainerId::new(response.id),
            warnings: response.warnings,
        })
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_start_error)
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Option<Duration>,
    ) -> Result<(), ContainerError> {
        let opts = StopContainerOptions {
            t: timeout.map(|t| t.as_secs() as i32),
            signal: None,
        };

        self.client
            .stop_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_stop_error)
    }

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .restart_container(id.as_str(), None::<RestartContainerOptions>)
            .await
            .map_err(map_container_not_found_error)
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_not_found_error)
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError> {
        let details = self
            .client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(map_container_not_found_error)?;

        let state = details.state.as_ref();
        let health = state
            .and_then(|s| s.health.as_ref())
            .and_then(|h| h.status)
            .map(|s| match s {
                bollard::models::HealthStatusEnum::STARTING => HealthState::Starting,
                bollard::models::HealthStatusEnum::HEALTHY => HealthState::Healthy,
                bollard::models::HealthStatusEnum::UNHEALTHY => HealthState::Unhealthy,
                _ => HealthState::None,
            });
        let started_at = state.and_then(|s| s.started_at.clone());

        Ok(ContainerInfo {
            id: ContainerId::new(details.id.unwrap_or_else(|| id.to_string())),
            health,
            started_at,
        })
    }

    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerRecord>, ContainerError> {
        let mut filter_map: HashMap<String, Vec<String>> = HashMap::new();

        if let Some(ref name) = filters.name {
            filter_map.insert("name".to_string(), vec![name.clone()]);
        }

        for (key, value) in &filters.labels {
            filter_map
                .entry("label".to_string())
                .or_default()
                .push(format!("{}={}", key, value));
        }

        let opts = ListContainersOptions {
            all: filters.all,
            filters: Some(filter_map),
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(|e| ContainerError::Runtime(e.to_string()))?;

        Ok(containers
            .into_iter()
            .map(|c| {
                let networks = c
                    .network_settings
                    .and_then(|settings| settings.networks)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(name, endpoint)| (name, endpoint.ip_address.unwrap_or_default()))
                    .collect();

                ContainerRecord {
                    id: ContainerId::new(c.id.unwrap_or_default()),
                    names: c.names.unwrap_or_default(),
                    image: c.image.unwrap_or_default(),
                    state: c
                        .state
                        .map(|s| ContainerState::from_runtime(&s.to_string()))
                        .unwrap_or(ContainerState::Exited),
                    created: c.created.unwrap_or_default(),
                    networks,
                    labels: c.labels.unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ContainerError> {
        self.client
            .rename_container(
                id.as_str(),
                RenameContainerOptions {
                    name: new_name.to_string(),
                },
            )
            .await
            .map_err(map_container_rename_error)
    }

    async fn upload_archive(
        &self,
        id: &ContainerId,
        dest_dir: &str,
        archive: Bytes,
    ) -> Result<(), ContainerError> {
        let opts = UploadToContainerOptions {
            path: dest_dir.to_string(),
            ..Default::default()
        };

        self.client
            .upload_to_container(id.as_str(), Some(opts), bollard::body_full(archive))
            .await
            .map_err(map_container_not_found_error)
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_images(&self) -> Result<Vec<ImageRecord>, ImageError> {
        let opts = ListImagesOptions {
            all: true,
            ..Default::default()
        };

        let images = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(e.to_string()))?;

        Ok(images
            .into_iter()
            .map(|image| ImageRecord {
                id: ImageId::new(image.id),
                repo_tags: image.repo_tags,
                created: image.created,
                size: image.size,
            })
            .collect())
    }

    async fn inspect_image(&self, reference: &str) -> Result<ImageInfo, ImageError> {
        let image = self
            .client
            .inspect_image(reference)
            .await
            .map_err(|e| map_image_error(e, reference))?;

        Ok(ImageInfo {
            id: ImageId::new(image.id.unwrap_or_else(|| reference.to_string())),
            repo_tags: image.repo_tags.unwrap_or_default(),
            created: image.created.map(|c| c.to_string()).unwrap_or_default(),
            size: image.size.unwrap_or_default(),
        })
    }

    async fn pull_image(&self, reference: &str) -> Result<(), ImageError> {
        let opts = CreateImageOptions {
            from_image: Some(reference.to_string()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates; the pull is done when it ends.
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            result.map_err(|e| ImageError::PullFailed(format!("{}: {}", reference, e)))?;
        }

        Ok(())
    }

    async fn remove_image(&self, reference: &str, force: bool) -> Result<(), ImageError> {
        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(reference, Some(opts), None)
            .await
            .map_err(|e| map_image_error(e, reference))?;

        Ok(())
    }

    async fn prune_images(&self) -> Result<(), ImageError> {
        let opts = PruneImagesOptions {
            filters: Some(dangling_filter()),
        };

        self.client
            .prune_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(e.to_string()))?;

        Ok(())
    }

    async fn search_images(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<ImageSearchResult>, ImageError> {
        let opts = SearchImagesOptions {
            term: term.to_string(),
            limit: Some(limit as i32),
            ..Default::default()
        };

        let results = self
            .client
            .search_images(opts)
            .await
            .map_err(|e| ImageError::Runtime(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|hit| ImageSearchResult {
                name: hit.name.unwrap_or_default(),
                description: hit.description.unwrap_or_default(),
                star_count: hit.star_count.unwrap_or_default(),
                official: hit.is_official.unwrap_or(false),
            })
            .collect())
    }

    async fn tag_image(&self, source: &str, repo: &str, tag: &str) -> Result<(), ImageError> {
        let opts = TagImageOptions {
            repo: Some(repo.to_string()),
            tag: Some(tag.to_string()),
        };

        self.client
            .tag_image(source, Some(opts))
            .await
            .map_err(|e| map_image_error(e, source))
    }

    async fn load_image(&self, archive: ArchiveStream) -> Result<ProgressStream, ImageError> {
        let opts = ImportImageOptions {
            quiet: false,
            ..Default::default()
        };

        let stream = self
            .client
            .import_image(opts, bollard::body_try_stream(archive), None)
            .filter_map(|result| async move {
                match result {
                    Ok(info) => info
                        .stream
                        .or(info.status)
                        .map(|line| line.trim_end().to_string())
                        .filter(|line| !line.is_empty())
                        .map(Ok),
                    Err(e) => Some(Err(ImageError::LoadFailed(e.to_string()))),
                }
            });

        Ok(Box::pin(stream))
    }

    fn export_images(&self, references: &[String]) -> ExportStream {
        let names: Vec<&str> = references.iter().map(String::as_str).collect();
        let joined = references.join(",");
        let stream = self
            .client
            .export_images(&names)
            .map(move |chunk| chunk.map_err(|e| map_image_error(e, &joined)));
        Box::pin(stream)
    }
}

#[async_trait]
impl NetworkOps for BollardRuntime {
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>, NetworkError> {
        let networks = self
            .client
            .list_networks(None::<ListNetworksOptions>)
            .await
            .map_err(|e| NetworkError::Runtime(e.to_string()))?;

        Ok(networks.into_iter().map(network_summary_record).collect())
    }

    async fn inspect_network(&self, id: &NetworkId) -> Result<NetworkRecord, NetworkError> {
        let network = self
            .client
            .inspect_network(id.as_str(), None::<InspectNetworkOptions>)
            .await
            .map_err(map_network_not_found_error)?;

        Ok(network_record(network))
    }

    async fn create_network(&self, config: &NetworkConfig) -> Result<NetworkId, NetworkError> {
        let ipam = (config.subnet.is_some() || config.gateway.is_some()).then(|| Ipam {
            config: Some(vec![IpamConfig {
                subnet: config.subnet.clone(),
                gateway: config.gateway.clone(),
                ..Default::default()
            }]),
            ..Default::default()
        });

        let request = NetworkCreateRequest {
            name: config.name.clone(),
            driver: config.driver.clone(),
            internal: Some(config.internal),
            attachable: Some(config.attachable),
            ipam,
            labels: (!config.labels.is_empty()).then(|| config.labels.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .create_network(request)
            .await
            .map_err(map_network_create_error)?;

        Ok(NetworkId::new(response.id))
    }

    async fn remove_network(&self, id: &NetworkId) -> Result<(), NetworkError> {
        self.client
            .remove_network(id.as_str())
            .await
            .map_err(map_network_remove_error)
    }

    async fn prune_networks(&self) -> Result<(), NetworkError> {
        self.client
            .prune_networks(None::<PruneNetworksOptions>)
            .await
            .map_err(|e| NetworkError::Runtime(e.to_string()))?;
        Ok(())
    }

    async fn connect_to_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), NetworkError> {
        let request = NetworkConnectRequest {
            container: container.to_string(),
            endpoint_config: Some(EndpointSettings::default()),
        };

        self.client
            .connect_network(network.as_str(), request)
            .await
            .map_err(map_network_connect_error)
    }

    async fn disconnect_from_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
        force: bool,
    ) -> Result<(), NetworkError> {
        let request = NetworkDisconnectRequest {
            container: container.to_string(),
            force: Some(force),
        };

        self.client
            .disconnect_network(network.as_str(), request)
            .await
            .map_err(map_network_disconnect_error)
    }
}

#[async_trait]
impl StatsOps for BollardRuntime {
    async fn usage_snapshot(&self, id: &ContainerId) -> Result<UsageSnapshot, StatsError> {
        // A non-streaming request that is not one-shot waits for two samples,
        // so precpu_stats is populated.
        let opts = StatsOptions {
            stream: false,
            one_shot: false,
        };

        let mut stream = self.client.stats(id.as_str(), Some(opts));
        let stats = stream
            .next()
            .await
            .ok_or_else(|| StatsError::NoSample(id.to_string()))?
            .map_err(map_stats_error)?;

        // Re-read through the daemon's JSON schema so only the typed subset
        // the manager needs is kept.
        serde_json::to_value(&stats)
            .and_then(serde_json::from_value)
            .map_err(|e| StatsError::Runtime(format!("malformed stats document: {}", e)))
    }
}

#[async_trait]
impl LogOps for BollardRuntime {
    async fn container_logs(
        &self,
        id: &ContainerId,
        opts: &LogOptions,
    ) -> Result<LogLineStream, LogError> {
        let log_opts = LogsOptions {
            stdout: opts.stdout,
            stderr: opts.stderr,
            follow: opts.follow,
            timestamps: opts.timestamps,
            tail: opts
                .tail
                .map(|n| n.to_string())
                .unwrap_or_else(|| "all".to_string()),
            ..Default::default()
        };

        let stream = self.client.logs(id.as_str(), Some(log_opts));

        let mapped_stream = stream.map(|result| {
            result
                .map(|output| {
                    let (stream, message) = match output {
                        bollard::container::LogOutput::StdErr { message } => {
                            (LogStream::Stderr, message)
                        }
                        bollard::container::LogOutput::StdOut { message }
                        | bollard::container::LogOutput::StdIn { message }
                        | bollard::container::LogOutput::Console { message } => {
                            (LogStream::Stdout, message)
                        }
                    };

                    LogLine {
                        content: String::from_utf8_lossy(&message).to_string(),
                        stream,
                    }
                })
                .map_err(|e| match status_of(&e) {
                    Some((404, message)) => LogError::ContainerNotFound(message.to_string()),
                    _ => LogError::StreamError(e.to_string()),
                })
        });

        Ok(Box::pin(mapped_stream))
    }
}
