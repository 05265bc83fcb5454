//! Photo Library Abstraction
//!
//! The device gallery is the shared, persistent photo/video library (distinct
//! from app-private document storage). Writes require authorization, which
//! the host platform tracks and may change between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::media::{GalleryAsset, ImageData, MediaKind};

/// Persistent-storage authorization as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationState {
    /// The user has not been asked yet
    NotDetermined,
    /// Access restricted by policy (parental controls, MDM)
    Restricted,
    /// The user refused access
    Denied,
    Authorized,
}

impl AuthorizationState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthorizationState::Authorized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationState::NotDetermined => "not_determined",
            AuthorizationState::Restricted => "restricted",
            AuthorizationState::Denied => "denied",
            AuthorizationState::Authorized => "authorized",
        }
    }
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gallery persistence and lookup.
///
/// Platform mappings:
/// - iOS: `PHPhotoLibrary` change requests and `PHAsset` fetches
/// - Android: `MediaStore`
/// - Desktop: a pictures folder (see `bridge-desktop`)
///
/// # Example
///
/// ```ignore
/// use bridge_traits::gallery::PhotoLibrary;
///
/// async fn save(library: &dyn PhotoLibrary, image: &ImageData) -> Result<Option<GalleryAsset>> {
///     library.save_image(image).await?;
///     library.fetch_latest(MediaKind::Image).await
/// }
/// ```
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// Current authorization state. Must be read fresh on every call.
    async fn authorization_status(&self) -> Result<AuthorizationState>;

    /// Prompt the user for access and return the resulting state.
    ///
    /// Only meaningful while the state is `NotDetermined`; platforms return
    /// the existing state otherwise.
    async fn request_authorization(&self) -> Result<AuthorizationState>;

    /// Persist a still image into the gallery.
    async fn save_image(&self, image: &ImageData) -> Result<()>;

    /// Persist the video file at `path` into the gallery. The source file is
    /// left in place.
    async fn save_video(&self, path: &Path) -> Result<()>;

    /// Most recently created asset of `kind` (creation date descending,
    /// first entry), if any.
    async fn fetch_latest(&self, kind: MediaKind) -> Result<Option<GalleryAsset>>;
}
