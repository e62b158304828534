// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Capability traits, endpoint detection and the bollard-backed gateway.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, default_socket_path, detect_local, resolve_endpoint};
pub use error::RuntimeError;
pub use traits::RuntimeInfo as RuntimeInfoTrait;
pub use traits::{
    ArchiveStream, ContainerConfig, ContainerCreated, ContainerError, ContainerFilters,
    ContainerInfo, ContainerOps, ContainerRecord, ContainerState, CpuStats, CpuUsage,
    ExportStream, HealthState, ImageError, ImageInfo, ImageOps, ImageRecord, IpamPool, LogError,
    LogLine, LogLineStream, LogOps, LogOptions, LogStream, MemoryStats, NetworkConfig,
    NetworkError, NetworkMember, NetworkOps, NetworkRecord, ProgressStream, RestartPolicyConfig,
    RuntimeGateway, RuntimeInfoError, RuntimeMetadata, StatsError, StatsOps, UsageSnapshot,
};
pub use types::{RuntimeConfig, RuntimeEndpoint, RuntimeType};

use std::time::Duration;

/// Resolve the endpoint for `config` and open a gateway to it.
///
/// With nothing configured and `DOCKER_HOST` set, the bollard environment
/// defaults win over socket probing.
pub fn connect(config: &RuntimeConfig, timeout: Duration) -> Result<BollardRuntime, RuntimeError> {
    if config.runtime.is_none()
        && config.socket.is_none()
        && std::env::var_os("DOCKER_HOST").is_some()
    {
        tracing::debug!("connecting using DOCKER_HOST");
        return Ok(BollardRuntime::connect_from_env()?);
    }

    let endpoint = resolve_endpoint(config)?;
    tracing::debug!(
        runtime = %endpoint.runtime_type,
        socket = %endpoint.socket_path,
        "connecting to container runtime"
    );
    Ok(BollardRuntime::connect(&endpoint, timeout)?)
}
