//! # Capture Options
//!
//! Caller-facing options and their resolution into the immutable
//! [`CaptureOptions`] a session runs with.
//!
//! Input keys are camelCase. The legacy spellings `saveToDocuments`,
//! `saveInFolder` and `hd` are accepted as aliases.
//!
//! ```rust
//! use core_capture::options::{CaptureOptions, CaptureOptionsInput};
//!
//! let input: CaptureOptionsInput =
//!     serde_json::from_str(r#"{ "width": 640, "format": "mp4", "hd": false }"#).unwrap();
//! let options = CaptureOptions::resolve(Some(&input)).unwrap();
//!
//! assert_eq!(options.target_height.map(|h| h.get()), Some(640));
//! assert!(!options.high_quality);
//! ```

use crate::error::{CaptureError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Component, Path};

/// Container handling for captured video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    /// Keep whatever the picker produced
    #[default]
    Default,
    /// Re-encode into an MP4 container
    Mp4,
}

/// Options as supplied by the caller. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureOptionsInput {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect_ratio: Option<bool>,
    pub save_to_gallery: Option<bool>,
    #[serde(alias = "saveToDocuments")]
    pub save_to_app_storage: Option<bool>,
    #[serde(alias = "saveInFolder")]
    pub save_subfolder: Option<String>,
    pub format: Option<VideoFormat>,
    #[serde(alias = "hd")]
    pub high_quality: Option<bool>,
}

impl CaptureOptionsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn keep_aspect_ratio(mut self, keep: bool) -> Self {
        self.keep_aspect_ratio = Some(keep);
        self
    }

    pub fn save_to_gallery(mut self, save: bool) -> Self {
        self.save_to_gallery = Some(save);
        self
    }

    pub fn save_to_app_storage(mut self, save: bool) -> Self {
        self.save_to_app_storage = Some(save);
        self
    }

    pub fn save_subfolder(mut self, folder: impl Into<String>) -> Self {
        self.save_subfolder = Some(folder.into());
        self
    }

    pub fn format(mut self, format: VideoFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = Some(high_quality);
        self
    }
}

/// Target-size hints attached to image results.
///
/// The core never resizes pixels; consumers apply these when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeHints {
    pub width: Option<NonZeroU32>,
    pub height: Option<NonZeroU32>,
    pub keep_aspect_ratio: bool,
}

impl ResizeHints {
    /// Whether a target size was requested at all.
    pub fn is_resize_requested(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Resolved, immutable options for one capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    pub target_width: Option<NonZeroU32>,
    pub target_height: Option<NonZeroU32>,
    pub keep_aspect_ratio: bool,
    pub save_to_gallery: bool,
    pub save_to_app_storage: bool,
    pub save_subfolder: Option<String>,
    pub video_format: VideoFormat,
    pub high_quality: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            target_width: None,
            target_height: None,
            keep_aspect_ratio: true,
            save_to_gallery: true,
            save_to_app_storage: false,
            save_subfolder: None,
            video_format: VideoFormat::Default,
            high_quality: true,
        }
    }
}

impl CaptureOptions {
    /// Apply defaults to caller input.
    ///
    /// A missing height defaults to the width. Without a width no resize is
    /// requested, even if a height is given; a zero dimension counts as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidOptions`] if the subfolder escapes the
    /// documents directory.
    pub fn resolve(input: Option<&CaptureOptionsInput>) -> Result<Self> {
        let Some(input) = input else {
            return Ok(Self::default());
        };
        let defaults = Self::default();

        let width = input.width.and_then(NonZeroU32::new);
        let height = input.height.and_then(NonZeroU32::new);
        let (target_width, target_height) = match (width, height) {
            (Some(w), h) => (Some(w), Some(h.unwrap_or(w))),
            (None, _) => (None, None),
        };

        Ok(Self {
            target_width,
            target_height,
            keep_aspect_ratio: input.keep_aspect_ratio.unwrap_or(defaults.keep_aspect_ratio),
            save_to_gallery: input.save_to_gallery.unwrap_or(defaults.save_to_gallery),
            save_to_app_storage: input
                .save_to_app_storage
                .unwrap_or(defaults.save_to_app_storage),
            save_subfolder: normalize_subfolder(input.save_subfolder.as_deref())?,
            video_format: input.format.unwrap_or(defaults.video_format),
            high_quality: input.high_quality.unwrap_or(defaults.high_quality),
        })
    }

    pub fn resize_hints(&self) -> ResizeHints {
        ResizeHints {
            width: self.target_width,
            height: self.target_height,
            keep_aspect_ratio: self.keep_aspect_ratio,
        }
    }

    /// Copy of these options with gallery persistence switched off.
    pub fn without_gallery_save(&self) -> Self {
        Self {
            save_to_gallery: false,
            ..self.clone()
        }
    }
}

fn normalize_subfolder(folder: Option<&str>) -> Result<Option<String>> {
    let Some(folder) = folder.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };

    let path = Path::new(folder);
    let escapes = path.components().any(|component| {
        !matches!(component, Component::Normal(_) | Component::CurDir)
    });
    if escapes || folder.starts_with('/') || folder.starts_with('\\') {
        return Err(CaptureError::InvalidOptions(format!(
            "saveSubfolder '{}' must be a relative path inside the documents directory",
            folder
        )));
    }

    Ok(Some(folder.to_string()))
}
