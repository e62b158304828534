// ABOUTME: Container operations of the manager facade.
// ABOUTME: Listing with derived state, lifecycle, file copy, usage and logs.

use super::Manager;
use super::error::{ManagerError, Resource};
use super::{telemetry, translate};
use crate::model::{ContainerSummary, MemoryUsage, Version};
use crate::runtime::{ContainerFilters, LogLineStream, LogOptions, RuntimeGateway};
use crate::types::ContainerId;
use bytes::Bytes;
use std::path::Path;

/// Pack one file into an in-memory tar archive under `name`.
pub fn pack_file(name: &str, contents: &[u8], mode: u32) -> std::io::Result<Vec<u8>> {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(mode);
    header.set_mtime(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
    );

    let mut builder = tar::Builder::new(Vec::new());
    builder.append_data(&mut header, name, contents)?;
    builder.into_inner()
}

/// Directory to extract into and the entry name for a destination path.
///
/// A destination ending in `/` is a directory and keeps the source file name.
fn split_destination(source: &Path, destination: &str) -> (String, String) {
    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if destination.ends_with('/') {
        return (destination.to_string(), source_name);
    }

    let dest = Path::new(destination);
    let dir = dest
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string());
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(source_name);
    (dir, name)
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}

impl<R: RuntimeGateway> Manager<R> {
    pub async fn version(&self) -> Result<Version, ManagerError> {
        let meta = self.runtime.version().await?;
        Ok(translate::version(meta))
    }

    /// All containers, stopped ones included, with reconciled state and uptime.
    pub async fn list_containers(&self) -> Result<Vec<ContainerSummary>, ManagerError> {
        let records = self
            .runtime
            .list_containers(&ContainerFilters::all())
            .await
            .map_err(ManagerError::container("list containers", "*"))?;

        let details = futures::future::join_all(
            records
                .iter()
                .map(|record| self.runtime.inspect_container(&record.id)),
        )
        .await;

        Ok(records
            .iter()
            .zip(details)
            .map(|(record, info)| {
                let info = info
                    .inspect_err(|e| {
                        tracing::debug!(container = %record.id.short(), error = %e, "inspect failed")
                    })
                    .ok();
                translate::container_summary(record, info.as_ref())
            })
            .collect())
    }

    pub async fn start_container(&self, id: &ContainerId) -> Result<(), ManagerError> {
        tracing::debug!(container = %id, "starting container");
        self.runtime
            .start_container(id)
            .await
            .map_err(ManagerError::container("start container", id))
    }

    /// Stop with the daemon's default grace period.
    pub async fn stop_container(&self, id: &ContainerId) -> Result<(), ManagerError> {
        tracing::debug!(container = %id, "stopping container");
        self.runtime
            .stop_container(id, None)
            .await
            .map_err(ManagerError::container("stop container", id))
    }

    pub async fn restart_container(&self, id: &ContainerId) -> Result<(), ManagerError> {
        tracing::debug!(container = %id, "restarting container");
        self.runtime
            .restart_container(id)
            .await
            .map_err(ManagerError::container("restart container", id))
    }

    /// Force-remove a container, running or not.
    pub async fn delete_container(&self, id: &ContainerId) -> Result<(), ManagerError> {
        tracing::info!(container = %id, "removing container");
        self.runtime
            .remove_container(id, true)
            .await
            .map_err(ManagerError::container("remove container", id))
    }

    pub async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ManagerError> {
        self.runtime
            .rename_container(id, new_name)
            .await
            .map_err(ManagerError::container("rename container", id))
    }

    /// Copy a local file to `destination` inside the container.
    pub async fn copy_file_to_container(
        &self,
        id: &ContainerId,
        source: &Path,
        destination: &str,
    ) -> Result<(), ManagerError> {
        let contents = tokio::fs::read(source)
            .await
            .map_err(ManagerError::io(source.display()))?;
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(ManagerError::io(source.display()))?;

        let (dir, name) = split_destination(source, destination);
        let archive =
            pack_file(&name, &contents, file_mode(&metadata)).map_err(ManagerError::io(&name))?;

        tracing::debug!(
            container = %id,
            dir = %dir,
            file = %name,
            bytes = contents.len(),
            "copying file into container"
        );
        self.runtime
            .upload_archive(id, &dir, Bytes::from(archive))
            .await
            .map_err(ManagerError::container("copy file", id))
    }

    pub async fn memory_usage(&self, id: &ContainerId) -> Result<MemoryUsage, ManagerError> {
        let snapshot = self.runtime.usage_snapshot(id).await?;
        telemetry::memory_usage(&snapshot)
    }

    pub async fn cpu_usage(&self, id: &ContainerId) -> Result<f64, ManagerError> {
        let snapshot = self.runtime.usage_snapshot(id).await?;
        telemetry::cpu_percent(&snapshot)
    }

    /// ID of the container with exactly this name; a leading `/` is ignored.
    pub async fn container_id_by_name(&self, name: &str) -> Result<ContainerId, ManagerError> {
        let wanted = name.trim_start_matches('/');
        let filters = ContainerFilters {
            name: Some(wanted.to_string()),
            all: true,
            ..Default::default()
        };

        let records = self
            .runtime
            .list_containers(&filters)
            .await
            .map_err(ManagerError::container("list containers", wanted))?;

        records
            .into_iter()
            .find(|record| record.name() == wanted)
            .map(|record| record.id)
            .ok_or_else(|| ManagerError::not_found(Resource::Container, wanted))
    }

    pub async fn container_logs(
        &self,
        id: &ContainerId,
        options: &LogOptions,
    ) -> Result<LogLineStream, ManagerError> {
        Ok(self.runtime.container_logs(id, options).await?)
    }
}
