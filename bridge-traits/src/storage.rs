//! Storage Abstractions
//!
//! App-private file storage used by the capture core for transcoded output
//! and temporary-file cleanup.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File system access trait
///
/// Platform mappings:
/// - iOS: the app sandbox `Documents` directory
/// - Android: `Context.getFilesDir()`
/// - Desktop: the user documents directory (see `bridge-desktop`)
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn output_path(fs: &dyn FileSystemAccess, name: &str) -> Result<PathBuf> {
///     let dir = fs.get_documents_directory().await?;
///     Ok(dir.join(name))
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Get the application's private document directory
    ///
    /// Files placed here persist until the app removes them.
    async fn get_documents_directory(&self) -> Result<PathBuf>;

    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Delete a file if present.
    ///
    /// Returns whether a file was removed.
    async fn remove_if_exists(&self, path: &Path) -> Result<bool> {
        if self.exists(path).await? {
            self.delete_file(path).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
