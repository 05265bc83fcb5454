//! Folder-backed photo library for desktop hosts.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    gallery::{AuthorizationState, PhotoLibrary},
    media::{GalleryAsset, ImageData, MediaKind},
};
use chrono::{DateTime, Utc};
use core_async::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::{debug, info};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v"];

/// Gallery stored as plain files in a pictures folder.
///
/// Desktop platforms have no shared photo library permission model, so the
/// library reports `Authorized` unless constructed otherwise. Assets are
/// identified by file name.
pub struct DirectoryPhotoLibrary {
    root: PathBuf,
    authorization: Mutex<AuthorizationState>,
    sequence: AtomicU64,
}

impl DirectoryPhotoLibrary {
    /// Library rooted at `<pictures>/Camera`
    pub fn new() -> Self {
        let root = dirs::picture_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
            .unwrap_or_else(std::env::temp_dir)
            .join("Camera");
        Self::with_root(root)
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            authorization: Mutex::new(AuthorizationState::Authorized),
            sequence: AtomicU64::new(0),
        }
    }

    /// Start from a specific authorization state (useful for exercising the
    /// permission flow on desktop).
    pub fn with_authorization(self, state: AuthorizationState) -> Self {
        *self.authorization.lock().unwrap_or_else(|e| e.into_inner()) = state;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn current_authorization(&self) -> AuthorizationState {
        *self.authorization.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_authorized(&self) -> Result<()> {
        let state = self.current_authorization();
        if state.is_authorized() {
            Ok(())
        } else {
            Err(BridgeError::PermissionDenied(format!(
                "photo library access is {}",
                state
            )))
        }
    }

    fn next_file_name(&self, prefix: &str, extension: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        format!(
            "{}_{}_{:04}.{}",
            prefix,
            Utc::now().timestamp_millis(),
            seq,
            extension
        )
    }

    fn extension_for_mime(mime_type: &str) -> &'static str {
        match mime_type {
            "image/png" => "png",
            "image/heic" | "image/heif" => "heic",
            _ => "jpg",
        }
    }

    fn kind_of(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl Default for DirectoryPhotoLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoLibrary for DirectoryPhotoLibrary {
    async fn authorization_status(&self) -> Result<AuthorizationState> {
        Ok(self.current_authorization())
    }

    async fn request_authorization(&self) -> Result<AuthorizationState> {
        let mut state = self.authorization.lock().unwrap_or_else(|e| e.into_inner());
        if *state == AuthorizationState::NotDetermined {
            *state = AuthorizationState::Authorized;
            info!(root = ?self.root, "Granted desktop photo library access");
        }
        Ok(*state)
    }

    async fn save_image(&self, image: &ImageData) -> Result<()> {
        self.ensure_authorized()?;
        fs::create_dir_all(&self.root).await?;

        let name = self.next_file_name("IMG", Self::extension_for_mime(&image.mime_type));
        let path = self.root.join(&name);
        fs::write(&path, image.bytes.as_ref()).await?;

        debug!(file = %name, size = image.bytes.len(), "Saved image to gallery");
        Ok(())
    }

    async fn save_video(&self, path: &Path) -> Result<()> {
        self.ensure_authorized()?;
        fs::create_dir_all(&self.root).await?;

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "mov".to_string());
        let name = self.next_file_name("VID", &extension);
        fs::copy(path, self.root.join(&name)).await?;

        debug!(file = %name, "Saved video to gallery");
        Ok(())
    }

    async fn fetch_latest(&self, kind: MediaKind) -> Result<Option<GalleryAsset>> {
        if !fs::try_exists(&self.root).await? {
            return Ok(None);
        }

        let mut newest: Option<(SystemTime, String)> = None;
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if Self::kind_of(&path) != Some(kind) {
                continue;
            }

            let metadata = entry.metadata().await?;
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            let name = entry.file_name().to_string_lossy().into_owned();

            let is_newer = match &newest {
                Some((best_time, best_name)) => (created, &name) > (*best_time, best_name),
                None => true,
            };
            if is_newer {
                newest = Some((created, name));
            }
        }

        Ok(newest.map(|(created, name)| GalleryAsset {
            local_identifier: name,
            media_kind: kind,
            creation_date: DateTime::<Utc>::from(created),
        }))
    }
}
