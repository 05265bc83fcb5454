//! Media payload types exchanged between the picker, the gallery and the core.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of media a picker can produce or a gallery can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Uniform type identifier the native picker reports for this kind.
    pub fn type_identifier(&self) -> &'static str {
        match self {
            MediaKind::Image => "public.image",
            MediaKind::Video => "public.movie",
        }
    }

    /// Map a native type identifier back onto a media kind.
    ///
    /// ```
    /// use bridge_traits::media::MediaKind;
    ///
    /// assert_eq!(MediaKind::from_type_identifier("public.movie"), Some(MediaKind::Video));
    /// assert_eq!(MediaKind::from_type_identifier("public.audio"), None);
    /// ```
    pub fn from_type_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "public.image" => Some(MediaKind::Image),
            "public.movie" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Still image handed over by the picker.
///
/// Holds the encoded bytes as produced by the native camera plus the metadata
/// the core needs. The pixel data is never decoded or resized here.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Encoded image bytes (JPEG/HEIC/PNG)
    pub bytes: Bytes,
    /// Pixel width reported by the picker
    pub width: u32,
    /// Pixel height reported by the picker
    pub height: u32,
    /// MIME type of `bytes`
    pub mime_type: String,
    /// Raw EXIF `DateTimeOriginal` value, if the picker supplied metadata
    pub exif_datetime: Option<String>,
}

impl ImageData {
    pub fn new(bytes: impl Into<Bytes>, width: u32, height: u32, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            width,
            height,
            mime_type: mime_type.into(),
            exif_datetime: None,
        }
    }

    pub fn with_exif_datetime(mut self, value: impl Into<String>) -> Self {
        self.exif_datetime = Some(value.into());
        self
    }
}

// Keep multi-megabyte payloads out of log output.
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mime_type", &self.mime_type)
            .field("exif_datetime", &self.exif_datetime)
            .finish()
    }
}

/// Payload of a "media captured" picker event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedMedia {
    /// A still photo
    Image(ImageData),
    /// A recorded movie written by the picker to a temporary file
    Video { path: PathBuf },
}

impl CapturedMedia {
    pub fn kind(&self) -> MediaKind {
        match self {
            CapturedMedia::Image(_) => MediaKind::Image,
            CapturedMedia::Video { .. } => MediaKind::Video,
        }
    }

    /// Temporary file path for video captures.
    pub fn video_path(&self) -> Option<&Path> {
        match self {
            CapturedMedia::Video { path } => Some(path),
            CapturedMedia::Image(_) => None,
        }
    }
}

/// Asset stored in the device gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryAsset {
    /// Gallery-specific stable identifier
    pub local_identifier: String,
    pub media_kind: MediaKind,
    /// Creation timestamp as recorded by the gallery (coarse-grained on most platforms)
    pub creation_date: DateTime<Utc>,
}
