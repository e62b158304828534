// ABOUTME: Runtime info trait of the runtime gateway.
// ABOUTME: Query daemon version and check connectivity.

use super::shared_types::RuntimeMetadata;
use async_trait::async_trait;

#[async_trait]
pub trait RuntimeInfo: Send + Sync {
    /// Version details of the daemon.
    async fn version(&self) -> Result<RuntimeMetadata, RuntimeInfoError>;

    async fn ping(&self) -> Result<(), RuntimeInfoError>;
}

/// Errors from runtime info operations.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
