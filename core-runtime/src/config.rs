//! # Core Configuration Module
//!
//! Provides configuration management for the media capture core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every host bridge and tuning value the capture core
//! needs. It enforces fail-fast validation so a missing bridge is reported
//! when the host wires the core up, not halfway through a capture session.
//!
//! ## Required Dependencies
//!
//! - `PickerHost` - Presents the native picker modal
//! - `PhotoLibrary` - Gallery authorization and persistence
//! - `VideoTranscoder` - Re-encodes captured video
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `FileSystemAccess` - Document storage (desktop default: tokio fs)
//! - `Clock` - Time source (default: system clock)
//! - `LoggerSink` - Host log forwarding (optional)
//! - `EventBus` - Progress events (default: a fresh bus)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CaptureSettings, CoreConfig};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .picker_host(Arc::new(MyPickerHost))
//!     .photo_library(Arc::new(MyPhotoLibrary))
//!     .video_transcoder(Arc::new(MyTranscoder))
//!     .settings(CaptureSettings::default().with_timestamp_skew_tolerance_ms(2000))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Panics: no picker host was provided
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required bridges");
//! ```

use crate::error::{Error, Result};
use crate::events::{EventBus, DEFAULT_EVENT_BUFFER_SIZE};
use bridge_traits::{
    Clock, FileSystemAccess, LoggerSink, PhotoLibrary, PickerHost, SystemClock, VideoTranscoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Default tolerance between a session's start and the creation date of the
/// gallery asset fetched back for it.
pub const DEFAULT_TIMESTAMP_SKEW_TOLERANCE_MS: i64 = 1000;

/// Default file name prefix for transcoded videos.
pub const DEFAULT_VIDEO_FILE_PREFIX: &str = "videoCapture_";

/// Tuning values for capture sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Maximum distance, in milliseconds, between the session start and the
    /// fetched gallery asset's creation date before a skew warning is raised.
    pub timestamp_skew_tolerance_ms: i64,

    /// Transcoded files are named `<prefix><unix-ms>.<ext>`.
    pub video_file_prefix: String,

    /// Settle with a timeout error if the picker has not produced a result
    /// within this window. `None` waits indefinitely.
    pub session_timeout: Option<Duration>,

    /// Capacity of the default event bus.
    pub event_buffer_size: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            timestamp_skew_tolerance_ms: DEFAULT_TIMESTAMP_SKEW_TOLERANCE_MS,
            video_file_prefix: DEFAULT_VIDEO_FILE_PREFIX.to_string(),
            session_timeout: None,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl CaptureSettings {
    pub fn with_timestamp_skew_tolerance_ms(mut self, tolerance_ms: i64) -> Self {
        self.timestamp_skew_tolerance_ms = tolerance_ms;
        self
    }

    pub fn with_video_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.video_file_prefix = prefix.into();
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = Some(timeout);
        self
    }

    pub fn with_event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.timestamp_skew_tolerance_ms < 0 {
            return Err(Error::Config(
                "Timestamp skew tolerance cannot be negative".to_string(),
            ));
        }

        if self.video_file_prefix.is_empty() {
            return Err(Error::Config(
                "Video file prefix cannot be empty".to_string(),
            ));
        }

        if self
            .video_file_prefix
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(Error::Config(format!(
                "Video file prefix '{}' must be a plain file name fragment",
                self.video_file_prefix.escape_debug()
            )));
        }

        if matches!(self.session_timeout, Some(timeout) if timeout.is_zero()) {
            return Err(Error::Config(
                "Session timeout must be greater than zero; omit it to wait indefinitely"
                    .to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Core configuration for the media capture core.
///
/// Holds every bridge and setting required to run capture sessions. Use
/// [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Native picker presentation (required)
    pub picker_host: Arc<dyn PickerHost>,

    /// Device gallery (required)
    pub photo_library: Arc<dyn PhotoLibrary>,

    /// Video encoder (required)
    pub video_transcoder: Arc<dyn VideoTranscoder>,

    /// App document storage (desktop default available)
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Time source
    pub clock: Arc<dyn Clock>,

    /// Host log forwarding (optional)
    pub logger_sink: Option<Arc<dyn LoggerSink>>,

    /// Progress event channel
    pub event_bus: EventBus,

    pub settings: CaptureSettings,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("picker_host", &"PickerHost { ... }")
            .field("photo_library", &"PhotoLibrary { ... }")
            .field("video_transcoder", &"VideoTranscoder { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("clock", &"Clock { ... }")
            .field(
                "logger_sink",
                &self.logger_sink.as_ref().map(|_| "LoggerSink { ... }"),
            )
            .field("event_bus", &self.event_bus)
            .field("settings", &self.settings)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

fn capability_missing_error(capability: &str, purpose: &str, platforms: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!("{} implementation is required {}. {}", capability, purpose, platforms),
    }
}

fn picker_host_missing_error() -> Error {
    capability_missing_error(
        "PickerHost",
        "to present the capture UI",
        "iOS: wrap UIImagePickerController. Android: wrap the camera intent. \
         Desktop: wrap the host toolkit's capture dialog.",
    )
}

fn photo_library_missing_error() -> Error {
    capability_missing_error(
        "PhotoLibrary",
        "for gallery authorization and persistence",
        "iOS: wrap PHPhotoLibrary. Android: wrap MediaStore. \
         Desktop: use bridge_desktop::DirectoryPhotoLibrary.",
    )
}

fn video_transcoder_missing_error() -> Error {
    capability_missing_error(
        "VideoTranscoder",
        "to export captured video",
        "iOS: wrap AVAssetExportSession. Android: wrap MediaCodec/Transformer. \
         Desktop: wrap an ffmpeg invocation.",
    )
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    let fs: Arc<dyn FileSystemAccess> = Arc::new(TokioFileSystem::new());
    Ok(fs)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(capability_missing_error(
        "FileSystemAccess",
        "to store transcoded video",
        "Desktop: ensure the 'desktop-shims' feature is enabled to use the default TokioFileSystem. \
         Mobile: inject the app sandbox document directory.",
    ))
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) once every required bridge is
/// set; missing bridges produce an actionable `CapabilityMissing` error.
#[derive(Default)]
pub struct CoreConfigBuilder {
    picker_host: Option<Arc<dyn PickerHost>>,
    photo_library: Option<Arc<dyn PhotoLibrary>>,
    video_transcoder: Option<Arc<dyn VideoTranscoder>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    clock: Option<Arc<dyn Clock>>,
    logger_sink: Option<Arc<dyn LoggerSink>>,
    event_bus: Option<EventBus>,
    settings: Option<CaptureSettings>,
}

impl CoreConfigBuilder {
    /// Sets the picker host implementation (required).
    pub fn picker_host(mut self, host: Arc<dyn PickerHost>) -> Self {
        self.picker_host = Some(host);
        self
    }

    /// Sets the photo library implementation (required).
    ///
    /// Authorization is read from it before every session and never cached.
    pub fn photo_library(mut self, library: Arc<dyn PhotoLibrary>) -> Self {
        self.photo_library = Some(library);
        self
    }

    /// Sets the video transcoder implementation (required).
    pub fn video_transcoder(mut self, transcoder: Arc<dyn VideoTranscoder>) -> Self {
        self.video_transcoder = Some(transcoder);
        self
    }

    /// Sets the file system access implementation.
    ///
    /// If not provided, the desktop default (tokio fs-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the time source. Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the host logger sink (optional).
    pub fn logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    /// Shares an existing event bus instead of creating one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Sets all capture settings at once.
    pub fn settings(mut self, settings: CaptureSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if a required bridge is missing or a setting is
    /// out of range.
    pub fn build(self) -> Result<CoreConfig> {
        let picker_host = self.picker_host.ok_or_else(picker_host_missing_error)?;
        let photo_library = self.photo_library.ok_or_else(photo_library_missing_error)?;
        let video_transcoder = self
            .video_transcoder
            .ok_or_else(video_transcoder_missing_error)?;

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let settings = self.settings.unwrap_or_default();
        settings.validate()?;

        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::new(settings.event_buffer_size));

        let config = CoreConfig {
            picker_host,
            photo_library,
            video_transcoder,
            file_system,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            logger_sink: self.logger_sink,
            event_bus,
            settings,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        AuthorizationState, CaptureSource, GalleryAsset, ImageData, MediaKind, PickerDelegate,
        PickerRequest, PresentationContext, TranscodeRequest,
    };
    use std::path::{Path, PathBuf};

    // Mock implementations for testing
    struct MockPickerHost;

    #[async_trait]
    impl PickerHost for MockPickerHost {
        fn is_source_available(&self, _source: CaptureSource) -> bool {
            true
        }

        fn available_media_types(&self, _source: CaptureSource) -> Vec<MediaKind> {
            vec![MediaKind::Image]
        }

        async fn presentation_context(&self) -> Option<PresentationContext> {
            None
        }

        async fn present(
            &self,
            _context: &PresentationContext,
            _request: PickerRequest,
            _delegate: PickerDelegate,
        ) -> BridgeResult<()> {
            Ok(())
        }

        async fn dismiss(&self, _context: &PresentationContext) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct MockPhotoLibrary;

    #[async_trait]
    impl PhotoLibrary for MockPhotoLibrary {
        async fn authorization_status(&self) -> BridgeResult<AuthorizationState> {
            Ok(AuthorizationState::Authorized)
        }

        async fn request_authorization(&self) -> BridgeResult<AuthorizationState> {
            Ok(AuthorizationState::Authorized)
        }

        async fn save_image(&self, _image: &ImageData) -> BridgeResult<()> {
            Ok(())
        }

        async fn save_video(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }

        async fn fetch_latest(&self, _kind: MediaKind) -> BridgeResult<Option<GalleryAsset>> {
            Ok(None)
        }
    }

    struct MockTranscoder;

    #[async_trait]
    impl VideoTranscoder for MockTranscoder {
        async fn transcode(&self, _request: TranscodeRequest) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct MockFileSystem;

    #[async_trait]
    impl FileSystemAccess for MockFileSystem {
        async fn get_documents_directory(&self) -> BridgeResult<PathBuf> {
            Ok(PathBuf::from("/documents"))
        }

        async fn exists(&self, _path: &Path) -> BridgeResult<bool> {
            Ok(false)
        }

        async fn create_dir_all(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }

        async fn delete_file(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }
    }

    fn complete_builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .picker_host(Arc::new(MockPickerHost))
            .photo_library(Arc::new(MockPhotoLibrary))
            .video_transcoder(Arc::new(MockTranscoder))
            .file_system(Arc::new(MockFileSystem))
    }

    #[test]
    fn test_builder_with_all_bridges() {
        let config = complete_builder().build().unwrap();

        assert_eq!(config.settings, CaptureSettings::default());
        assert!(config.logger_sink.is_none());
        assert_eq!(config.event_bus.subscriber_count(), 0);
    }

    #[test]
    fn test_missing_picker_host() {
        let result = CoreConfig::builder()
            .photo_library(Arc::new(MockPhotoLibrary))
            .video_transcoder(Arc::new(MockTranscoder))
            .file_system(Arc::new(MockFileSystem))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, message }) => {
                assert_eq!(capability, "PickerHost");
                assert!(message.contains("capture UI"));
            }
            other => panic!("expected CapabilityMissing, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_photo_library() {
        let result = CoreConfig::builder()
            .picker_host(Arc::new(MockPickerHost))
            .video_transcoder(Arc::new(MockTranscoder))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "PhotoLibrary"
        ));
    }

    #[test]
    fn test_missing_video_transcoder() {
        let result = CoreConfig::builder()
            .picker_host(Arc::new(MockPickerHost))
            .photo_library(Arc::new(MockPhotoLibrary))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "VideoTranscoder"
        ));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_file_system_without_shims() {
        let result = CoreConfig::builder()
            .picker_host(Arc::new(MockPickerHost))
            .photo_library(Arc::new(MockPhotoLibrary))
            .video_transcoder(Arc::new(MockTranscoder))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, message }) => {
                assert_eq!(capability, "FileSystemAccess");
                assert!(message.contains("desktop-shims"));
            }
            other => panic!("expected CapabilityMissing, got {:?}", other.map(|_| ())),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_desktop_default_file_system() {
        let config = CoreConfig::builder()
            .picker_host(Arc::new(MockPickerHost))
            .photo_library(Arc::new(MockPhotoLibrary))
            .video_transcoder(Arc::new(MockTranscoder))
            .build();

        assert!(config.is_ok());
    }

    #[test]
    fn test_default_settings() {
        let settings = CaptureSettings::default();

        assert_eq!(settings.timestamp_skew_tolerance_ms, 1000);
        assert_eq!(settings.video_file_prefix, "videoCapture_");
        assert_eq!(settings.session_timeout, None);
        assert_eq!(settings.event_buffer_size, 100);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let negative = CaptureSettings::default().with_timestamp_skew_tolerance_ms(-1);
        assert!(matches!(negative.validate(), Err(Error::Config(_))));

        let slash = CaptureSettings::default().with_video_file_prefix("clips/video_");
        assert!(matches!(slash.validate(), Err(Error::Config(_))));

        let zero_timeout = CaptureSettings::default().with_session_timeout(Duration::ZERO);
        assert!(matches!(zero_timeout.validate(), Err(Error::Config(_))));

        let result = complete_builder()
            .settings(CaptureSettings::default().with_event_buffer_size(0))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_shared_event_bus() {
        let bus = EventBus::new(8);
        let _receiver = bus.subscribe();

        let config = complete_builder().event_bus(bus.clone()).build().unwrap();

        assert_eq!(config.event_bus.subscriber_count(), 1);
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = complete_builder()
            .settings(CaptureSettings::default().with_session_timeout(Duration::from_secs(30)))
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("PickerHost { ... }"));
        assert!(debug.contains("session_timeout: Some(30s)"));
    }
}
