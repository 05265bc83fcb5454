//! # Result Assembler
//!
//! Turns a captured still image into the [`MediaResult`] a session settles
//! with.
//!
//! Without gallery persistence the raw picker image is returned as-is. With
//! it, the image is saved and the newest gallery image is fetched back. The
//! gallery offers no handle to the asset it just created, so recency is the
//! only link; the fetched asset's creation date is compared with the moment
//! the picker delivered the image to flag when that guess looks wrong.

use crate::error::{CaptureError, Result};
use crate::exif::parse_exif_datetime;
use crate::result::{ImageAsset, ImageSource, MediaResult};
use crate::session::CaptureSession;
use bridge_traits::{GalleryAsset, ImageData, MediaKind, PhotoLibrary};
use chrono::NaiveDateTime;
use core_runtime::events::{CaptureEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct ResultAssembler {
    library: Arc<dyn PhotoLibrary>,
    event_bus: EventBus,
    skew_tolerance_ms: i64,
}

impl ResultAssembler {
    pub fn new(library: Arc<dyn PhotoLibrary>, event_bus: EventBus, skew_tolerance_ms: i64) -> Self {
        Self {
            library,
            event_bus,
            skew_tolerance_ms,
        }
    }

    /// Build the image result for `session`.
    ///
    /// # Errors
    ///
    /// [`CaptureError::Persistence`] if saving fails or the saved image
    /// cannot be found again.
    pub async fn assemble_image(
        &self,
        session: &CaptureSession,
        image: ImageData,
    ) -> Result<MediaResult> {
        let resize_hints = session.options.resize_hints();
        let captured_at = captured_at(&image);

        let source = if session.options.save_to_gallery {
            ImageSource::Gallery(self.persist(session, &image).await?)
        } else {
            debug!(session_id = %session.id, "Returning in-memory image");
            ImageSource::InMemory(image)
        };

        Ok(MediaResult::ImageAsset(ImageAsset {
            source,
            resize_hints,
            captured_at,
        }))
    }

    async fn persist(&self, session: &CaptureSession, image: &ImageData) -> Result<GalleryAsset> {
        if let Err(e) = self.library.save_image(image).await {
            error!(session_id = %session.id, error = %e, "Failed to save image to gallery");
            return Err(CaptureError::persistence(MediaKind::Image, e.to_string()));
        }

        self.emit(CaptureEvent::SavedToGallery {
            session_id: session.id.to_string(),
            media_kind: MediaKind::Image.to_string(),
        });

        let asset = self
            .library
            .fetch_latest(MediaKind::Image)
            .await
            .map_err(|e| CaptureError::persistence(MediaKind::Image, e.to_string()))?
            .ok_or_else(|| {
                CaptureError::persistence(
                    MediaKind::Image,
                    "saved image not found in gallery",
                )
            })?;

        let skew_ms = (asset.creation_date - session.capture_reference())
            .num_milliseconds()
            .abs();
        if skew_ms > self.skew_tolerance_ms {
            warn!(
                session_id = %session.id,
                asset = %asset.local_identifier,
                skew_ms,
                tolerance_ms = self.skew_tolerance_ms,
                "Gallery image was not created around capture time; it may not be the captured image"
            );
            self.emit(CaptureEvent::TimestampSkew {
                session_id: session.id.to_string(),
                skew_ms,
                tolerance_ms: self.skew_tolerance_ms,
            });
        }

        Ok(asset)
    }

    fn emit(&self, event: CaptureEvent) {
        let _ = self.event_bus.emit(CoreEvent::Capture(event));
    }
}

fn captured_at(image: &ImageData) -> Option<NaiveDateTime> {
    let raw = image.exif_datetime.as_deref()?;
    match parse_exif_datetime(raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(value = raw, error = %e, "Ignoring malformed EXIF DateTimeOriginal");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CaptureOptions, CaptureOptionsInput};
    use crate::session::SessionId;
    use crate::mocks::MockLibrary;
    use bridge_traits::BridgeError;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use core_runtime::events::EventStream;

    fn started_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn session(input: CaptureOptionsInput) -> CaptureSession {
        let options = CaptureOptions::resolve(Some(&input)).unwrap();
        CaptureSession::new(SessionId::new(), options, started_at()).0
    }

    fn image() -> ImageData {
        ImageData::new(vec![0xFFu8, 0xD8, 0xFF, 0xE0], 4032, 3024, "image/jpeg")
    }

    fn asset_created(offset_ms: i64) -> GalleryAsset {
        GalleryAsset {
            local_identifier: "ABC-123/L0/001".to_string(),
            media_kind: MediaKind::Image,
            creation_date: started_at() + Duration::milliseconds(offset_ms),
        }
    }

    fn assembler(library: MockLibrary) -> (ResultAssembler, EventStream) {
        let bus = EventBus::new(16);
        let stream = EventStream::new(bus.subscribe());
        (ResultAssembler::new(Arc::new(library), bus, 1000), stream)
    }

    #[core_async::test]
    async fn test_in_memory_image_carries_input_hints() {
        let mut library = MockLibrary::new();
        library.expect_save_image().never();
        library.expect_fetch_latest().never();

        let (assembler, _events) = assembler(library);
        let session = session(
            CaptureOptionsInput::new()
                .width(800)
                .keep_aspect_ratio(false)
                .save_to_gallery(false),
        );

        let result = assembler.assemble_image(&session, image()).await.unwrap();
        let asset = result.as_image().unwrap();

        assert_eq!(asset.image_data(), Some(&image()));
        assert_eq!(asset.resize_hints, session.options.resize_hints());
        assert_eq!(asset.resize_hints.width.map(|w| w.get()), Some(800));
        assert_eq!(asset.resize_hints.height.map(|h| h.get()), Some(800));
        assert!(!asset.resize_hints.keep_aspect_ratio);
    }

    #[core_async::test]
    async fn test_gallery_image_fetched_back() {
        let mut library = MockLibrary::new();
        library.expect_save_image().times(1).returning(|_| Ok(()));
        library
            .expect_fetch_latest()
            .withf(|kind| *kind == MediaKind::Image)
            .times(1)
            .returning(|_| Ok(Some(asset_created(400))));

        let (assembler, mut events) = assembler(library);
        let session = session(CaptureOptionsInput::new());

        let result = assembler.assemble_image(&session, image()).await.unwrap();

        assert_eq!(
            result.as_image().unwrap().gallery_asset(),
            Some(&asset_created(400))
        );
        let events = events.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            CoreEvent::Capture(CaptureEvent::SavedToGallery { .. })
        ));
    }

    #[core_async::test]
    async fn test_skew_beyond_tolerance_warns_but_succeeds() {
        let mut library = MockLibrary::new();
        library.expect_save_image().returning(|_| Ok(()));
        library
            .expect_fetch_latest()
            .returning(|_| Ok(Some(asset_created(-1500))));

        let (assembler, mut events) = assembler(library);
        let session = session(CaptureOptionsInput::new());

        let result = assembler.assemble_image(&session, image()).await;

        assert!(result.is_ok());
        assert!(events.drain().contains(&CoreEvent::Capture(
            CaptureEvent::TimestampSkew {
                session_id: session.id.to_string(),
                skew_ms: 1500,
                tolerance_ms: 1000,
            }
        )));
    }

    #[core_async::test]
    async fn test_skew_at_tolerance_is_silent() {
        let mut library = MockLibrary::new();
        library.expect_save_image().returning(|_| Ok(()));
        library
            .expect_fetch_latest()
            .returning(|_| Ok(Some(asset_created(1000))));

        let (assembler, mut events) = assembler(library);
        let session = session(CaptureOptionsInput::new());

        assembler.assemble_image(&session, image()).await.unwrap();

        assert!(!events
            .drain()
            .iter()
            .any(|event| matches!(event, CoreEvent::Capture(CaptureEvent::TimestampSkew { .. }))));
    }

    #[core_async::test]
    async fn test_save_failure_is_persistence_error() {
        let mut library = MockLibrary::new();
        library
            .expect_save_image()
            .returning(|_| Err(BridgeError::PermissionDenied("revoked".into())));
        library.expect_fetch_latest().never();

        let (assembler, _events) = assembler(library);
        let session = session(CaptureOptionsInput::new());

        let err = assembler.assemble_image(&session, image()).await.unwrap_err();
        assert!(matches!(
            err,
            CaptureError::Persistence {
                media_kind: MediaKind::Image,
                ..
            }
        ));
    }

    #[core_async::test]
    async fn test_missing_asset_is_persistence_error() {
        let mut library = MockLibrary::new();
        library.expect_save_image().returning(|_| Ok(()));
        library.expect_fetch_latest().returning(|_| Ok(None));

        let (assembler, _events) = assembler(library);
        let session = session(CaptureOptionsInput::new());

        let err = assembler.assemble_image(&session, image()).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[core_async::test]
    async fn test_exif_date_attached() {
        let library = MockLibrary::new();
        let (assembler, _events) = assembler(library);
        let session = session(CaptureOptionsInput::new().save_to_gallery(false));

        let valid = image().with_exif_datetime("2024:05:01 09:29:58");
        let result = assembler.assemble_image(&session, valid).await.unwrap();
        assert_eq!(
            result.as_image().unwrap().captured_at.map(|d| d.to_string()),
            Some("2024-05-01 09:29:58".to_string())
        );

        let malformed = image().with_exif_datetime("2024-05-01T09:29:58");
        let result = assembler.assemble_image(&session, malformed).await.unwrap();
        assert_eq!(result.as_image().unwrap().captured_at, None);
    }
}
