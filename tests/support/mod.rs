// ABOUTME: Test support utilities.
// ABOUTME: A recording in-memory runtime gateway and record builders.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use dockhand::model::ImageSearchResult;
use dockhand::runtime::{
    ArchiveStream, ContainerConfig, ContainerCreated, ContainerError, ContainerFilters,
    ContainerInfo, ContainerOps, ContainerRecord, ContainerState, ExportStream, HealthState,
    ImageError, ImageInfo, ImageOps, ImageRecord, LogError, LogLine, LogLineStream, LogOps,
    LogOptions, LogStream, NetworkConfig, NetworkError, NetworkMember, NetworkOps, NetworkRecord,
    ProgressStream, RuntimeInfoError, RuntimeInfoTrait, RuntimeMetadata, StatsError, StatsOps,
    UsageSnapshot,
};
use dockhand::types::{ContainerId, ImageId, NetworkId};
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Once;
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("dockhand=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Canned runtime state plus failures to inject, consumed once each.
#[derive(Default)]
pub struct FakeState {
    pub containers: Vec<ContainerRecord>,
    pub inspections: HashMap<String, ContainerInfo>,
    pub images: Vec<ImageRecord>,
    pub image_details: HashMap<String, ImageInfo>,
    pub networks: Vec<NetworkRecord>,
    pub snapshot: Option<UsageSnapshot>,
    pub create_warnings: Vec<String>,
    pub load_progress: Vec<String>,
    pub export_chunks: Vec<Bytes>,
    pub search_hits: Vec<ImageSearchResult>,
    pub logs: Vec<LogLine>,

    pub fail_create: Option<ContainerError>,
    pub fail_attach: Option<NetworkError>,
    pub fail_start: Option<ContainerError>,
    pub fail_remove: Option<ContainerError>,
    pub fail_export: Option<ImageError>,
    /// Sent after `load_progress` as the final progress item.
    pub fail_load: Option<ImageError>,

    pub created: Vec<ContainerConfig>,
    pub created_networks: Vec<NetworkConfig>,
    pub uploads: Vec<(String, String, Bytes)>,
    pub loaded: Vec<Bytes>,
    pub loaded_chunks: Vec<usize>,
    pub tags: Vec<(String, String, String)>,
}

/// In-memory gateway that records every call as a short line like
/// `start c0ffee`.
#[derive(Default)]
pub struct FakeRuntime {
    pub state: Mutex<FakeState>,
    calls: Mutex<Vec<String>>,
}

pub const CREATED_ID: &str = "c0ffee0000000000000000000000000000000000000000000000000000000000";

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(self, id: &str, name: &str) -> Self {
        self.state.lock().networks.push(network_record(id, name));
        self
    }

    pub fn with_container(self, record: ContainerRecord) -> Self {
        self.state.lock().containers.push(record);
        self
    }

    pub fn with_inspection(self, info: ContainerInfo) -> Self {
        self.state
            .lock()
            .inspections
            .insert(info.id.to_string(), info);
        self
    }

    pub fn with_image(self, record: ImageRecord) -> Self {
        self.state.lock().images.push(record);
        self
    }

    pub fn with_snapshot(self, snapshot: UsageSnapshot) -> Self {
        self.state.lock().snapshot = Some(snapshot);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Whether any recorded call starts with `prefix`.
    pub fn called(&self, prefix: &str) -> bool {
        self.calls.lock().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

pub fn container_record(id: &str, name: &str, state: ContainerState) -> ContainerRecord {
    ContainerRecord {
        id: ContainerId::new(id),
        names: vec![format!("/{}", name)],
        image: "nginx:1.25".to_string(),
        state,
        created: 1_700_000_000,
        networks: BTreeMap::new(),
        labels: HashMap::new(),
    }
}

pub fn container_info(
    id: &str,
    health: Option<HealthState>,
    started_at: Option<&str>,
) -> ContainerInfo {
    ContainerInfo {
        id: ContainerId::new(id),
        health,
        started_at: started_at.map(str::to_string),
    }
}

pub fn image_record(id: &str, tags: &[&str], size: i64) -> ImageRecord {
    ImageRecord {
        id: ImageId::new(id),
        repo_tags: tags.iter().map(|t| t.to_string()).collect(),
        created: 1_700_000_000,
        size,
    }
}

pub fn network_record(id: &str, name: &str) -> NetworkRecord {
    NetworkRecord {
        id: id.to_string(),
        name: name.to_string(),
        driver: "bridge".to_string(),
        scope: "local".to_string(),
        created: "2024-07-09T14:14:31.5Z".to_string(),
        ..Default::default()
    }
}

pub fn member(name: &str, ipv4: &str) -> NetworkMember {
    NetworkMember {
        name: name.to_string(),
        ipv4_address: ipv4.to_string(),
    }
}

#[async_trait]
impl RuntimeInfoTrait for FakeRuntime {
    async fn version(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        self.record("version".to_string());
        Ok(RuntimeMetadata {
            version: "27.1.1".to_string(),
            api_version: "1.46".to_string(),
            min_api_version: "1.24".to_string(),
            git_commit: "cc13f95".to_string(),
            go_version: "go1.21.12".to_string(),
            os: "linux".to_string(),
            arch: "amd64".to_string(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.record("ping".to_string());
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerCreated, ContainerError> {
        self.record(format!("create {}", config.name));
        let mut state = self.state.lock();
        if let Some(e) = state.fail_create.take() {
            return Err(e);
        }
        state.created.push(config.clone());
        Ok(ContainerCreated {
            id: ContainerId::new(CREATED_ID),
            warnings: state.create_warnings.clone(),
        })
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(format!("start {}", id));
        match self.state.lock().fail_start.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: Option<Duration>,
    ) -> Result<(), ContainerError> {
        self.record(format!("stop {}", id));
        Ok(())
    }

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(format!("restart {}", id));
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        self.record(format!("remove {} force={}", id, force));
        match self.state.lock().fail_remove.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError> {
        self.record(format!("inspect-container {}", id));
        self.state
            .lock()
            .inspections
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))
    }

    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerRecord>, ContainerError> {
        self.record("list-containers".to_string());
        let state = self.state.lock();
        Ok(state
            .containers
            .iter()
            .filter(|c| {
                filters
                    .name
                    .as_deref()
                    .is_none_or(|name| c.name().contains(name))
            })
            .cloned()
            .collect())
    }

    async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ContainerError> {
        self.record(format!("rename {} {}", id, new_name));
        Ok(())
    }

    async fn upload_archive(
        &self,
        id: &ContainerId,
        dest_dir: &str,
        archive: Bytes,
    ) -> Result<(), ContainerError> {
        self.record(format!("upload {} {}", id, dest_dir));
        self.state
            .lock()
            .uploads
            .push((id.to_string(), dest_dir.to_string(), archive));
        Ok(())
    }
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn list_images(&self) -> Result<Vec<ImageRecord>, ImageError> {
        self.record("list-images".to_string());
        Ok(self.state.lock().images.clone())
    }

    async fn inspect_image(&self, reference: &str) -> Result<ImageInfo, ImageError> {
        self.record(format!("inspect-image {}", reference));
        self.state
            .lock()
            .image_details
            .get(reference)
            .cloned()
            .ok_or_else(|| ImageError::NotFound(reference.to_string()))
    }

    async fn pull_image(&self, reference: &str) -> Result<(), ImageError> {
        self.record(format!("pull {}", reference));
        Ok(())
    }

    async fn remove_image(&self, reference: &str, force: bool) -> Result<(), ImageError> {
        self.record(format!("remove-image {} force={}", reference, force));
        Ok(())
    }

    async fn prune_images(&self) -> Result<(), ImageError> {
        self.record("prune-images".to_string());
        Ok(())
    }

    async fn search_images(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<ImageSearchResult>, ImageError> {
        self.record(format!("search {} limit={}", term, limit));
        Ok(self.state.lock().search_hits.clone())
    }

    async fn tag_image(&self, source: &str, repo: &str, tag: &str) -> Result<(), ImageError> {
        self.record(format!("tag {} {}:{}", source, repo, tag));
        self.state
            .lock()
            .tags
            .push((source.to_string(), repo.to_string(), tag.to_string()));
        Ok(())
    }

    async fn load_image(&self, mut archive: ArchiveStream) -> Result<ProgressStream, ImageError> {
        let mut received = Vec::new();
        let mut chunks = 0;
        while let Some(chunk) = archive.next().await {
            let chunk = chunk.map_err(|e| ImageError::LoadFailed(e.to_string()))?;
            received.extend_from_slice(&chunk);
            chunks += 1;
        }
        self.record(format!("load {} bytes", received.len()));

        let mut state = self.state.lock();
        state.loaded.push(Bytes::from(received));
        state.loaded_chunks.push(chunks);
        let mut items: Vec<Result<String, ImageError>> =
            state.load_progress.iter().cloned().map(Ok).collect();
        if let Some(e) = state.fail_load.take() {
            items.push(Err(e));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn export_images(&self, references: &[String]) -> ExportStream {
        self.record(format!("export {}", references.join(",")));
        let mut state = self.state.lock();
        let mut items: Vec<Result<Bytes, ImageError>> =
            state.export_chunks.iter().cloned().map(Ok).collect();
        if let Some(e) = state.fail_export.take() {
            items.push(Err(e));
        }
        Box::pin(futures::stream::iter(items))
    }
}

#[async_trait]
impl NetworkOps for FakeRuntime {
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>, NetworkError> {
        self.record("list-networks".to_string());
        Ok(self.state.lock().networks.clone())
    }

    async fn inspect_network(&self, id: &NetworkId) -> Result<NetworkRecord, NetworkError> {
        self.record(format!("inspect-network {}", id));
        self.state
            .lock()
            .networks
            .iter()
            .find(|n| n.id == id.as_str() || n.name == id.as_str())
            .cloned()
            .ok_or_else(|| NetworkError::NotFound(id.to_string()))
    }

    async fn create_network(&self, config: &NetworkConfig) -> Result<NetworkId, NetworkError> {
        self.record(format!("create-network {}", config.name));
        self.state.lock().created_networks.push(config.clone());
        Ok(NetworkId::new(format!("net-{}", config.name)))
    }

    async fn remove_network(&self, id: &NetworkId) -> Result<(), NetworkError> {
        self.record(format!("remove-network {}", id));
        Ok(())
    }

    async fn prune_networks(&self) -> Result<(), NetworkError> {
        self.record("prune-networks".to_string());
        Ok(())
    }

    async fn connect_to_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), NetworkError> {
        self.record(format!("connect {} {}", container, network));
        match self.state.lock().fail_attach.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn disconnect_from_network(
        &self,
        container: &ContainerId,
        network: &NetworkId,
        force: bool,
    ) -> Result<(), NetworkError> {
        self.record(format!("disconnect {} {} force={}", container, network, force));
        Ok(())
    }
}

#[async_trait]
impl StatsOps for FakeRuntime {
    async fn usage_snapshot(&self, id: &ContainerId) -> Result<UsageSnapshot, StatsError> {
        self.record(format!("stats {}", id));
        self.state
            .lock()
            .snapshot
            .clone()
            .ok_or_else(|| StatsError::ContainerNotFound(id.to_string()))
    }
}

#[async_trait]
impl LogOps for FakeRuntime {
    async fn container_logs(
        &self,
        id: &ContainerId,
        opts: &LogOptions,
    ) -> Result<LogLineStream, LogError> {
        self.record(format!("logs {} follow={} tail={:?}", id, opts.follow, opts.tail));
        let lines: Vec<Result<LogLine, LogError>> =
            self.state.lock().logs.iter().cloned().map(Ok).collect();
        Ok(Box::pin(futures::stream::iter(lines)))
    }
}

pub fn log_line(content: &str, stream: LogStream) -> LogLine {
    LogLine {
        content: content.to_string(),
        stream,
    }
}
