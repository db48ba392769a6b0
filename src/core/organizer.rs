use crate::{
    ai::ClassificationResult,
    error::{AppError, Result},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Deletes the inbox original once its copy is in place.
#[async_trait]
pub trait FileRemover: Send + Sync {
    async fn remove(&self, path: &Path) -> std::io::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct FsRemover;

#[async_trait]
impl FileRemover for FsRemover {
    async fn remove(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}

/// Files documents into `<output_root>/<group>/<subgroup>/<filename>.<ext>`.
pub struct Organizer {
    output_root: PathBuf,
    remover: Arc<dyn FileRemover>,
}

impl Organizer {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self::with_remover(output_root, Arc::new(FsRemover))
    }

    pub fn with_remover(output_root: impl Into<PathBuf>, remover: Arc<dyn FileRemover>) -> Self {
        Self {
            output_root: output_root.into(),
            remover,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Create the output root (and parents) so group directories can be created inside it
    pub async fn ensure_output_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_root)
            .await
            .map_err(|e| AppError::filing(&self.output_root, e.to_string()))
    }

    /// Copy `original` to its destination, then delete it.
    ///
    /// Not a move: the copy always lands before the delete, so a failure in
    /// between leaves a duplicate rather than losing the document. An existing
    /// file at the destination is overwritten.
    pub async fn file(&self, original: &Path, result: &ClassificationResult) -> Result<PathBuf> {
        let group_dir = self.output_root.join(&result.group);
        ensure_dir(&group_dir).await?;

        let subgroup_dir = group_dir.join(&result.subgroup);
        ensure_dir(&subgroup_dir).await?;

        let destination =
            subgroup_dir.join(format!("{}.{}", result.filename, file_extension(original)));

        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            warn!("Overwriting existing file {}", destination.display());
        }

        tokio::fs::copy(original, &destination).await.map_err(|e| {
            AppError::filing(
                &destination,
                format!("Failed to copy from {}: {}", original.display(), e),
            )
        })?;

        self.remover.remove(original).await.map_err(|e| {
            AppError::filing(original, format!("Failed to remove original: {}", e))
        })?;

        info!("Filed {} as {}", original.display(), destination.display());
        Ok(destination)
    }
}

/// Create one directory level; the parent must already exist.
async fn ensure_dir(path: &Path) -> Result<()> {
    match tokio::fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(AppError::filing(
            path,
            format!("Failed to create directory: {}", e),
        )),
    }
}

/// Lowercased text after the last `.` of the file name, or the whole name without one
pub fn file_extension(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}
