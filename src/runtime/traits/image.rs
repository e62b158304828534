// ABOUTME: Image operations of the runtime gateway.
// ABOUTME: List, inspect, pull, tag, search, prune, load and export images.

use super::shared_types::{ImageInfo, ImageRecord};
use crate::model::ImageSearchResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Chunks of an image archive as the runtime produces them.
pub type ExportStream = Pin<Box<dyn Stream<Item = Result<Bytes, ImageError>> + Send>>;

/// Chunks of a local image archive on their way to the runtime.
pub type ArchiveStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Progress messages of an image load, in the order the runtime sends them.
pub type ProgressStream = Pin<Box<dyn Stream<Item = Result<String, ImageError>> + Send>>;

#[async_trait]
pub trait ImageOps: Send + Sync {
    /// All local images, intermediate layers included.
    async fn list_images(&self) -> Result<Vec<ImageRecord>, ImageError>;

    async fn inspect_image(&self, reference: &str) -> Result<ImageInfo, ImageError>;

    /// Pull an image, waiting for the pull to finish.
    async fn pull_image(&self, reference: &str) -> Result<(), ImageError>;

    async fn remove_image(&self, reference: &str, force: bool) -> Result<(), ImageError>;

    /// Remove dangling images.
    async fn prune_images(&self) -> Result<(), ImageError>;

    async fn search_images(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<ImageSearchResult>, ImageError>;

    /// Add the tag `repo:tag` to an existing image.
    async fn tag_image(&self, source: &str, repo: &str, tag: &str) -> Result<(), ImageError>;

    /// Load an image archive streamed from `archive`.
    ///
    /// The load runs while the returned progress stream is polled.
    async fn load_image(&self, archive: ArchiveStream) -> Result<ProgressStream, ImageError>;

    /// Stream the archive of the given images.
    fn export_images(&self, references: &[String]) -> ExportStream;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("load failed: {0}")]
    LoadFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
