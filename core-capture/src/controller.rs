//! # Picker Session Controller
//!
//! Drives one `take_picture` call from picker presentation to a settled
//! result.
//!
//! ## Flow
//!
//! 1. Claim the session slot (a second concurrent call fails fast)
//! 2. Resolve options and run the authorization gate
//! 3. Look up the presentation context and present the picker
//! 4. Await the single delegate event (optionally bounded by a timeout)
//! 5. Dismiss the picker and hand the media to the assembler or the video
//!    pipeline
//! 6. Settle the session and release the slot
//!
//! Every exit path after session creation settles the session, so the caller
//! always receives either a [`MediaResult`] or a typed [`CaptureError`].

use crate::assembler::ResultAssembler;
use crate::authorization::AuthorizationGate;
use crate::error::{CaptureError, Result};
use crate::options::{CaptureOptions, CaptureOptionsInput};
use crate::result::MediaResult;
use crate::session::{await_outcome, CaptureSession, SessionId, SessionSlot, SessionState};
use crate::video::VideoPipeline;
use bridge_traits::{
    CaptureSource, CapturedMedia, Clock, PickerDelegate, PickerEvent, PickerEventReceiver,
    PickerHost, PickerRequest, PresentationContext, PresentationStyle,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CaptureEvent, CoreEvent, EventBus, SessionOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

/// Sequences picker, gallery and transcoder for capture sessions.
///
/// At most one session is in flight per coordinator.
pub struct CaptureCoordinator {
    picker_host: Arc<dyn PickerHost>,
    gate: AuthorizationGate,
    assembler: ResultAssembler,
    video: VideoPipeline,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    session_timeout: Option<Duration>,
    slot: SessionSlot,
}

impl CaptureCoordinator {
    pub fn new(config: &CoreConfig) -> Self {
        let settings = &config.settings;
        Self {
            picker_host: config.picker_host.clone(),
            gate: AuthorizationGate::new(config.photo_library.clone(), config.event_bus.clone()),
            assembler: ResultAssembler::new(
                config.photo_library.clone(),
                config.event_bus.clone(),
                settings.timestamp_skew_tolerance_ms,
            ),
            video: VideoPipeline::new(
                config.photo_library.clone(),
                config.video_transcoder.clone(),
                config.file_system.clone(),
                config.clock.clone(),
                config.event_bus.clone(),
                settings.video_file_prefix.clone(),
            ),
            clock: config.clock.clone(),
            event_bus: config.event_bus.clone(),
            session_timeout: settings.session_timeout,
            slot: SessionSlot::new(),
        }
    }

    /// Whether the device has a camera the picker can use.
    pub fn is_available(&self) -> bool {
        self.picker_host.is_source_available(CaptureSource::Camera)
    }

    /// Ask for photo library access if the user has not decided yet.
    pub async fn request_permissions(&self) {
        self.gate.request_permission().await;
    }

    /// The session currently holding the slot, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.slot.active_session()
    }

    /// Present the camera picker and resolve with the captured media.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::CaptureInProgress`] if another session is in flight
    /// - [`CaptureError::InvalidOptions`] for a rejected `save_subfolder`
    /// - [`CaptureError::NoPresentationContext`] if nothing can host the picker
    /// - [`CaptureError::Cancelled`] if the user dismissed the picker
    /// - [`CaptureError::PickerClosed`] if the host dropped the delegate
    /// - [`CaptureError::TimedOut`] if the configured session timeout elapsed
    /// - [`CaptureError::Persistence`] / [`CaptureError::Transcode`] from the
    ///   finishing steps
    pub async fn take_picture(&self, input: Option<CaptureOptionsInput>) -> Result<MediaResult> {
        let session_id = SessionId::new();
        let _slot = self.slot.claim(session_id)?;

        let span = info_span!("capture_session", session_id = %session_id);
        self.run_session(session_id, input).instrument(span).await
    }

    async fn run_session(
        &self,
        session_id: SessionId,
        input: Option<CaptureOptionsInput>,
    ) -> Result<MediaResult> {
        let mut options = CaptureOptions::resolve(input.as_ref())?;
        if !self
            .gate
            .check_and_maybe_downgrade(options.save_to_gallery)
            .await
        {
            options = options.without_gallery_save();
        }

        let (mut session, completion) = CaptureSession::new(session_id, options, self.clock.now());
        info!(save_to_gallery = session.options.save_to_gallery, "Capture session started");
        self.emit(CaptureEvent::SessionStarted {
            session_id: session_id.to_string(),
            save_to_gallery: session.options.save_to_gallery,
        });

        let outcome = self.drive(&mut session).await;
        let summary = match &outcome {
            Ok(_) => SessionOutcome::Succeeded,
            Err(e) if e.is_cancelled() => SessionOutcome::Cancelled,
            Err(_) => SessionOutcome::Failed,
        };

        session.settle(outcome);
        self.emit(CaptureEvent::SessionSettled {
            session_id: session_id.to_string(),
            outcome: summary,
        });
        debug!(outcome = ?summary, "Capture session settled");

        await_outcome(completion).await
    }

    async fn drive(&self, session: &mut CaptureSession) -> Result<MediaResult> {
        let context = self
            .picker_host
            .presentation_context()
            .await
            .ok_or(CaptureError::NoPresentationContext)?;

        let request = PickerRequest {
            source: CaptureSource::Camera,
            media_types: self
                .picker_host
                .available_media_types(CaptureSource::Camera),
            presentation_style: PresentationStyle::CurrentContext,
        };
        let (delegate, events) = PickerDelegate::channel();

        self.picker_host.present(&context, request, delegate).await?;
        session.transition(SessionState::Presented)?;
        self.emit(CaptureEvent::PickerPresented {
            session_id: session.id.to_string(),
        });

        match self.await_picker(events, &context).await? {
            PickerEvent::Cancelled => {
                info!("Picker cancelled by user");
                self.dismiss(&context).await;
                Err(CaptureError::Cancelled)
            }
            PickerEvent::Finished(media) => {
                session.transition(SessionState::Finishing)?;
                session.record_media_received(self.clock.now());
                self.dismiss(&context).await;
                self.emit(CaptureEvent::MediaCaptured {
                    session_id: session.id.to_string(),
                    media_kind: media.kind().to_string(),
                });

                match media {
                    CapturedMedia::Image(image) => {
                        self.assembler.assemble_image(session, image).await
                    }
                    CapturedMedia::Video { path } => self.video.finish(session, path).await,
                }
            }
        }
    }

    async fn await_picker(
        &self,
        events: PickerEventReceiver,
        context: &PresentationContext,
    ) -> Result<PickerEvent> {
        let received = match self.session_timeout {
            Some(limit) => match core_async::timeout(limit, events).await {
                Ok(received) => received,
                Err(_) => {
                    warn!(timeout = ?limit, "Picker did not respond before the session timeout");
                    self.dismiss(context).await;
                    return Err(CaptureError::TimedOut(limit));
                }
            },
            None => events.await,
        };

        match received {
            Ok(event) => Ok(event),
            Err(_) => {
                warn!("Picker delegate dropped without an event");
                self.dismiss(context).await;
                Err(CaptureError::PickerClosed)
            }
        }
    }

    async fn dismiss(&self, context: &PresentationContext) {
        if let Err(e) = self.picker_host.dismiss(context).await {
            warn!(context = %context.id, error = %e, "Failed to dismiss picker");
        }
    }

    fn emit(&self, event: CaptureEvent) {
        let _ = self.event_bus.emit(CoreEvent::Capture(event));
    }
}
