// ABOUTME: Log operations of the runtime gateway.
// ABOUTME: Streams container output with filtering options.

use crate::types::ContainerId;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Lines of container output as they arrive.
pub type LogLineStream = Pin<Box<dyn Stream<Item = Result<LogLine, LogError>> + Send>>;

#[async_trait]
pub trait LogOps: Send + Sync {
    async fn container_logs(
        &self,
        id: &ContainerId,
        opts: &LogOptions,
    ) -> Result<LogLineStream, LogError>;
}

/// Options for log streaming.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub stdout: bool,
    pub stderr: bool,
    /// Keep the stream open for new output (like `tail -f`).
    pub follow: bool,
    pub timestamps: bool,
    /// Number of lines to show from the end; `None` shows everything.
    pub tail: Option<u64>,
}

impl LogOptions {
    /// Both streams without timestamps.
    pub fn both_streams(follow: bool, tail: Option<u64>) -> Self {
        Self {
            stdout: true,
            stderr: true,
            follow,
            timestamps: false,
            tail,
        }
    }
}

/// A single chunk of container output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub content: String,
    pub stream: LogStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

/// Errors from log operations.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("stream error: {0}")]
    StreamError(String),
}
