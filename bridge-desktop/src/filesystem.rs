//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::FileSystemAccess,
};
use core_async::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tokio-based file system implementation
///
/// Transcoded captures land in `<documents>/media-capture`.
pub struct TokioFileSystem {
    documents_dir: PathBuf,
}

impl TokioFileSystem {
    /// Create a new file system accessor with the default documents directory
    pub fn new() -> Self {
        let documents_dir = dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .unwrap_or_else(std::env::temp_dir)
            .join("media-capture");

        Self { documents_dir }
    }

    /// Create a new file system accessor rooted at a custom directory
    pub fn with_documents_directory(documents_dir: PathBuf) -> Self {
        Self { documents_dir }
    }

    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }
}

impl Default for TokioFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn get_documents_directory(&self) -> Result<PathBuf> {
        if !fs::try_exists(&self.documents_dir)
            .await
            .map_err(Self::map_io_error)?
        {
            fs::create_dir_all(&self.documents_dir)
                .await
                .map_err(Self::map_io_error)?;
            debug!(path = ?self.documents_dir, "Created documents directory");
        }
        Ok(self.documents_dir.clone())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path).await.map_err(Self::map_io_error)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(Self::map_io_error)?;
        debug!(path = ?path, "Created directory");
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }
}
