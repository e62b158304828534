// ABOUTME: Capability traits that make up the runtime gateway.
// ABOUTME: ContainerOps, ImageOps, NetworkOps, LogOps, StatsOps and RuntimeInfo.

mod container;
mod image;
mod logs;
mod network;
mod runtime_info;
mod shared_types;
mod stats;

pub use container::{ContainerError, ContainerFilters, ContainerOps};
pub use image::{ArchiveStream, ExportStream, ImageError, ImageOps, ProgressStream};
pub use logs::{LogError, LogLine, LogOps, LogOptions, LogStream, LogLineStream};
pub use network::{NetworkError, NetworkOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;
pub use stats::{CpuStats, CpuUsage, MemoryStats, StatsError, StatsOps, UsageSnapshot};

/// Everything the manager needs from a container runtime.
///
/// Implemented automatically for any type providing all capabilities, so
/// test doubles only implement the individual traits.
pub trait RuntimeGateway:
    ContainerOps + ImageOps + NetworkOps + LogOps + StatsOps + RuntimeInfo
{
}

impl<T> RuntimeGateway for T where
    T: ContainerOps + ImageOps + NetworkOps + LogOps + StatsOps + RuntimeInfo
{
}
