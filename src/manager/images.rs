// ABOUTME: Image operations of the manager facade.
// ABOUTME: Listing with tag expansion, lookups, pull/tag/search and archive import/export.

use super::error::{ManagerError, Resource};
use super::{Manager, SEARCH_LIMIT, translate};
use crate::model::{ImageSearchResult, ImageSummary};
use crate::runtime::{ArchiveStream, RuntimeGateway};
use bytes::BytesMut;
use futures::StreamExt;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Split `repo[:tag]` into repository and tag, defaulting to `latest`.
///
/// A colon followed by a path segment belongs to a registry port.
fn split_reference(reference: &str) -> (&str, &str) {
    match reference.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (reference, "latest"),
    }
}

/// Read size for streaming an image archive to the runtime.
pub const ARCHIVE_CHUNK_SIZE: usize = 64 * 1024;

/// Read `file` as a stream of chunks, ending at end of file.
fn archive_chunks(file: tokio::fs::File) -> ArchiveStream {
    Box::pin(futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = BytesMut::with_capacity(ARCHIVE_CHUNK_SIZE);
        let read = file.read_buf(&mut buf).await?;
        Ok::<_, std::io::Error>((read > 0).then(|| (buf.freeze(), file)))
    }))
}

impl<R: RuntimeGateway> Manager<R> {
    /// One summary per repo tag of every tagged local image.
    pub async fn list_images(&self) -> Result<Vec<ImageSummary>, ManagerError> {
        let records = self
            .runtime
            .list_images()
            .await
            .map_err(ManagerError::image("list images", "*"))?;

        Ok(records.iter().flat_map(translate::image_summaries).collect())
    }

    /// Force-remove an image.
    pub async fn delete_image(&self, reference: &str) -> Result<(), ManagerError> {
        tracing::info!(image = %reference, "removing image");
        self.runtime
            .remove_image(reference, true)
            .await
            .map_err(ManagerError::image("remove image", reference))
    }

    /// Remove dangling images.
    pub async fn prune_images(&self) -> Result<(), ManagerError> {
        self.runtime
            .prune_images()
            .await
            .map_err(ManagerError::image("prune images", "dangling"))
    }

    pub async fn search_images(&self, term: &str) -> Result<Vec<ImageSearchResult>, ManagerError> {
        self.runtime
            .search_images(term, SEARCH_LIMIT)
            .await
            .map_err(ManagerError::image("search images", term))
    }

    pub async fn pull_image(&self, reference: &str) -> Result<(), ManagerError> {
        tracing::info!(image = %reference, "pulling image");
        self.runtime
            .pull_image(reference)
            .await
            .map_err(ManagerError::image("pull image", reference))
    }

    /// Tag `source` as `target` (`repo[:tag]`).
    pub async fn tag_image(&self, source: &str, target: &str) -> Result<(), ManagerError> {
        let (repo, tag) = split_reference(target);
        tracing::debug!(image = %source, repo = %repo, tag = %tag, "tagging image");
        self.runtime
            .tag_image(source, repo, tag)
            .await
            .map_err(ManagerError::image("tag image", source))
    }

    /// Load an image archive, echoing the runtime's progress to `progress`.
    ///
    /// The file is streamed in chunks and each progress line is written as
    /// soon as the runtime sends it.
    pub async fn import_image<W: Write + Send>(
        &self,
        path: &Path,
        progress: &mut W,
    ) -> Result<(), ManagerError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(ManagerError::io(path.display()))?;
        tracing::info!(path = %path.display(), "importing image archive");

        let mut lines = self
            .runtime
            .load_image(archive_chunks(file))
            .await
            .map_err(ManagerError::image("import image", path.display()))?;

        while let Some(line) = lines.next().await {
            let line = line.map_err(ManagerError::image("import image", path.display()))?;
            writeln!(progress, "{}", line).map_err(ManagerError::io("progress output"))?;
        }
        Ok(())
    }

    /// Write the archive of `references` to `path`.
    ///
    /// A partially written file is removed when the stream fails.
    pub async fn export_image(&self, references: &[String], path: &Path) -> Result<(), ManagerError> {
        tracing::info!(images = ?references, path = %path.display(), "exporting images");
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(ManagerError::io(path.display()))?;

        let result = self.write_archive(references, &mut file, path).await;
        if result.is_err() {
            drop(file);
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::debug!(path = %path.display(), error = %e, "could not remove partial archive");
            }
        }
        result
    }

    async fn write_archive(
        &self,
        references: &[String],
        file: &mut tokio::fs::File,
        path: &Path,
    ) -> Result<(), ManagerError> {
        let mut stream = self.runtime.export_images(references);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ManagerError::image("export image", references.join(",")))?;
            file.write_all(&chunk)
                .await
                .map_err(ManagerError::io(path.display()))?;
        }
        file.flush().await.map_err(ManagerError::io(path.display()))
    }

    /// The image carrying exactly this `name:tag`.
    pub async fn image_by_name(&self, repo_tag: &str) -> Result<ImageSummary, ManagerError> {
        let records = self
            .runtime
            .list_images()
            .await
            .map_err(ManagerError::image("list images", repo_tag))?;

        records
            .iter()
            .find_map(|record| {
                let index = record.repo_tags.iter().position(|t| t == repo_tag)?;
                translate::image_summaries(record).into_iter().nth(index)
            })
            .ok_or_else(|| ManagerError::not_found(Resource::Image, repo_tag))
    }

    /// Summary of an image's first repo tag; `NoTag` when it has none.
    pub async fn image_by_id(&self, id: &str) -> Result<ImageSummary, ManagerError> {
        let info = self
            .runtime
            .inspect_image(id)
            .await
            .map_err(ManagerError::image("inspect image", id))?;
        translate::image_summary_from_info(&info)
    }
}
