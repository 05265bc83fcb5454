//! Values a settled capture session resolves to.

use bridge_traits::{GalleryAsset, ImageData, MediaKind};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::options::ResizeHints;

/// Where the bytes of a captured image can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw picker image, not persisted anywhere
    InMemory(ImageData),
    /// Asset fetched back from the gallery after saving
    Gallery(GalleryAsset),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub source: ImageSource,
    pub resize_hints: ResizeHints,
    /// EXIF `DateTimeOriginal`, when the picker supplied a well-formed one
    pub captured_at: Option<NaiveDateTime>,
}

impl ImageAsset {
    pub fn gallery_asset(&self) -> Option<&GalleryAsset> {
        match &self.source {
            ImageSource::Gallery(asset) => Some(asset),
            ImageSource::InMemory(_) => None,
        }
    }

    pub fn image_data(&self) -> Option<&ImageData> {
        match &self.source {
            ImageSource::InMemory(image) => Some(image),
            ImageSource::Gallery(_) => None,
        }
    }
}

/// Successful outcome of `take_picture`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaResult {
    ImageAsset(ImageAsset),
    /// Path to the resulting video file
    VideoFile(PathBuf),
}

impl MediaResult {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaResult::ImageAsset(_) => MediaKind::Image,
            MediaResult::VideoFile(_) => MediaKind::Video,
        }
    }

    pub fn as_image(&self) -> Option<&ImageAsset> {
        match self {
            MediaResult::ImageAsset(asset) => Some(asset),
            MediaResult::VideoFile(_) => None,
        }
    }

    pub fn video_path(&self) -> Option<&Path> {
        match self {
            MediaResult::VideoFile(path) => Some(path),
            MediaResult::ImageAsset(_) => None,
        }
    }
}
