//! Camera service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (picker, photo
//! library, transcoder, filesystem) into the capture core. Desktop apps
//! typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) and only supply the picker and the transcoder.

pub mod error;

pub use error::{CoreError, Result};

pub use core_capture::{
    CaptureError, CaptureOptionsInput, ImageAsset, ImageSource, MediaResult, ResizeHints,
    VideoFormat,
};
pub use core_runtime::config::{CaptureSettings, CoreConfig};
pub use core_runtime::events::CoreEvent;

use std::sync::Arc;

use core_capture::{CaptureCoordinator, SessionId};
use core_runtime::events::{EventBus, Receiver};
use tracing::info;

#[cfg(feature = "desktop-shims")]
use bridge_traits::{PickerHost, VideoTranscoder};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CameraService {
    coordinator: Arc<CaptureCoordinator>,
    event_bus: EventBus,
}

impl CameraService {
    /// Create a new service from a built configuration.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        info!(
            session_timeout = ?config.settings.session_timeout,
            skew_tolerance_ms = config.settings.timestamp_skew_tolerance_ms,
            "Camera service initialized"
        );
        Ok(Self {
            coordinator: Arc::new(CaptureCoordinator::new(&config)),
            event_bus: config.event_bus,
        })
    }

    /// Whether the device has a usable camera.
    pub fn is_available(&self) -> bool {
        self.coordinator.is_available()
    }

    /// Prompt for photo library access if the user has not decided yet.
    ///
    /// Outcomes are published as permission events.
    pub async fn request_permissions(&self) {
        self.coordinator.request_permissions().await;
    }

    /// Capture a photo or video.
    ///
    /// `None` applies the defaults: no resize, save to gallery, default video
    /// format, high quality.
    pub async fn take_picture(
        &self,
        options: Option<CaptureOptionsInput>,
    ) -> core_capture::Result<MediaResult> {
        self.coordinator.take_picture(options).await
    }

    /// Receive capture and permission events.
    pub fn subscribe_events(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    /// The capture session in flight, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.coordinator.active_session()
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Uses the desktop documents directory and a folder-backed gallery; the host
/// supplies the picker and the transcoder.
///
/// ```ignore
/// use core_service::bootstrap_desktop;
///
/// let service = bootstrap_desktop(Arc::new(MyPicker), Arc::new(FfmpegTranscoder))?;
/// let result = service.take_picture(None).await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    picker_host: Arc<dyn PickerHost>,
    video_transcoder: Arc<dyn VideoTranscoder>,
) -> Result<CameraService> {
    use bridge_desktop::DirectoryPhotoLibrary;

    let config = CoreConfig::builder()
        .picker_host(picker_host)
        .photo_library(Arc::new(DirectoryPhotoLibrary::new()))
        .video_transcoder(video_transcoder)
        .build()?;
    CameraService::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        AuthorizationState, CaptureSource, CapturedMedia, FileSystemAccess, GalleryAsset,
        ImageData, MediaKind, PhotoLibrary, PickerDelegate, PickerHost, PickerRequest,
        PresentationContext, TranscodeRequest, VideoTranscoder,
    };
    use core_runtime::events::{CaptureEvent, PermissionEvent};
    use mockall::mock;
    use std::path::{Path, PathBuf};

    mock! {
        Picker {}

        #[async_trait]
        impl PickerHost for Picker {
            fn is_source_available(&self, source: CaptureSource) -> bool;
            fn available_media_types(&self, source: CaptureSource) -> Vec<MediaKind>;
            async fn presentation_context(&self) -> Option<PresentationContext>;
            async fn present(
                &self,
                context: &PresentationContext,
                request: PickerRequest,
                delegate: PickerDelegate,
            ) -> BridgeResult<()>;
            async fn dismiss(&self, context: &PresentationContext) -> BridgeResult<()>;
        }
    }

    mock! {
        Library {}

        #[async_trait]
        impl PhotoLibrary for Library {
            async fn authorization_status(&self) -> BridgeResult<AuthorizationState>;
            async fn request_authorization(&self) -> BridgeResult<AuthorizationState>;
            async fn save_image(&self, image: &ImageData) -> BridgeResult<()>;
            async fn save_video(&self, path: &Path) -> BridgeResult<()>;
            async fn fetch_latest(&self, kind: MediaKind) -> BridgeResult<Option<GalleryAsset>>;
        }
    }

    mock! {
        Transcoder {}

        #[async_trait]
        impl VideoTranscoder for Transcoder {
            async fn transcode(&self, request: TranscodeRequest) -> BridgeResult<()>;
        }
    }

    mock! {
        Fs {}

        #[async_trait]
        impl FileSystemAccess for Fs {
            async fn get_documents_directory(&self) -> BridgeResult<PathBuf>;
            async fn exists(&self, path: &Path) -> BridgeResult<bool>;
            async fn create_dir_all(&self, path: &Path) -> BridgeResult<()>;
            async fn delete_file(&self, path: &Path) -> BridgeResult<()>;
        }
    }

    fn service(picker: MockPicker, library: MockLibrary) -> CameraService {
        let config = CoreConfig::builder()
            .picker_host(Arc::new(picker))
            .photo_library(Arc::new(library))
            .video_transcoder(Arc::new(MockTranscoder::new()))
            .file_system(Arc::new(MockFs::new()))
            .build()
            .unwrap();
        CameraService::new(config).unwrap()
    }

    #[test]
    fn test_is_available_delegates_to_picker() {
        let mut picker = MockPicker::new();
        picker.expect_is_source_available().returning(|_| false);

        let service = service(picker, MockLibrary::new());
        assert!(!service.is_available());
    }

    #[core_async::test]
    async fn test_request_permissions_publishes_status() {
        let mut library = MockLibrary::new();
        library
            .expect_authorization_status()
            .returning(|| Ok(AuthorizationState::Restricted));

        let service = service(MockPicker::new(), library);
        let mut events = service.subscribe_events();

        service.request_permissions().await;

        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Permission(PermissionEvent::StatusResolved {
                state: "restricted".to_string(),
                authorized: false,
            })
        );
    }

    #[core_async::test]
    async fn test_take_picture_reports_session_events() {
        let mut picker = MockPicker::new();
        picker
            .expect_presentation_context()
            .returning(|| Some(PresentationContext::new("main-window")));
        picker
            .expect_available_media_types()
            .returning(|_| vec![MediaKind::Image]);
        picker.expect_present().returning(|_, _, delegate| {
            delegate.did_finish(CapturedMedia::Image(ImageData::new(
                vec![1u8, 2, 3],
                2,
                2,
                "image/png",
            )));
            Ok(())
        });
        picker.expect_dismiss().returning(|_| Ok(()));

        let service = service(picker, MockLibrary::new());
        let mut events = service.subscribe_events();

        let input = CaptureOptionsInput::new().save_to_gallery(false);
        let result = service.take_picture(Some(input)).await.unwrap();
        assert_eq!(result.kind(), MediaKind::Image);
        assert!(service.active_session().is_none());

        let first = events.recv().await.unwrap();
        assert!(matches!(
            first,
            CoreEvent::Capture(CaptureEvent::SessionStarted {
                save_to_gallery: false,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = CoreConfig::builder()
            .picker_host(Arc::new(MockPicker::new()))
            .photo_library(Arc::new(MockLibrary::new()))
            .video_transcoder(Arc::new(MockTranscoder::new()))
            .file_system(Arc::new(MockFs::new()))
            .build()
            .unwrap();
        config.settings.video_file_prefix = String::new();

        match CameraService::new(config) {
            Err(CoreError::Config(message)) => assert!(message.contains("prefix")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("empty prefix accepted"),
        }
    }
}
