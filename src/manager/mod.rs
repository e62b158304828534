// ABOUTME: Management facade over a container runtime gateway.
// ABOUTME: Containers, images and networks as stable summary entities.

mod containers;
mod error;
mod images;
mod networks;
mod provision;
pub mod telemetry;
pub mod translate;

pub use containers::pack_file;
pub use error::{ManagerError, ManagerErrorKind, Resource};
pub use images::ARCHIVE_CHUNK_SIZE;
pub use provision::{
    CleanupPolicy, ProvisionError, ProvisionRequest, ProvisionStep, bind_strings,
    container_config, port_table,
};

use crate::runtime::RuntimeGateway;

/// Number of hits requested from a registry search.
pub const SEARCH_LIMIT: u32 = 10;

/// Operations over an injected runtime gateway.
///
/// The manager holds no state of its own; every call is answered by the
/// runtime, so concurrent calls through `&self` are fine.
pub struct Manager<R> {
    runtime: R,
    cleanup: CleanupPolicy,
}

impl<R: RuntimeGateway> Manager<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            cleanup: CleanupPolicy::default(),
        }
    }

    /// Set what provisioning does with a container when attach or start fails.
    pub fn with_cleanup(mut self, policy: CleanupPolicy) -> Self {
        self.cleanup = policy;
        self
    }

    pub fn cleanup_policy(&self) -> CleanupPolicy {
        self.cleanup
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}
