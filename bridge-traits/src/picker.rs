//! Native Picker Abstraction
//!
//! The picker itself is a black-box modal owned by the host UI. The core asks
//! the host for its top-most presentation context, hands it a
//! [`PickerRequest`] together with a [`PickerDelegate`], and then waits for the
//! single event the delegate delivers.

use async_trait::async_trait;
use core_async::sync::oneshot;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::{CapturedMedia, MediaKind};

/// Where the picker sources media from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureSource {
    /// Live capture through the device camera
    Camera,
    /// Selection from the existing photo library
    PhotoLibrary,
}

/// Modal presentation style requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PresentationStyle {
    /// Cover only the presenting view's context
    #[default]
    CurrentContext,
    FullScreen,
}

/// Handle to the host view that will present the modal.
///
/// The identifier is opaque to the core; it is passed back to the host on
/// `present` and `dismiss`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentationContext {
    pub id: String,
}

impl PresentationContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Configuration of one picker presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
    pub source: CaptureSource,
    /// Media kinds the picker may produce. Empty means "host default".
    pub media_types: Vec<MediaKind>,
    pub presentation_style: PresentationStyle,
}

/// The single terminal event of a picker presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// The user captured media
    Finished(CapturedMedia),
    /// The user dismissed the picker without capturing
    Cancelled,
}

/// Receiving side of a picker delegate, held by the core.
pub type PickerEventReceiver = oneshot::Receiver<PickerEvent>;

/// Callback object handed to the host for one picker presentation.
///
/// Both event methods consume the delegate, so a host can deliver at most one
/// event per presentation. Dropping the delegate without calling either is
/// observed by the core as the picker closing unexpectedly.
#[derive(Debug)]
pub struct PickerDelegate {
    sender: oneshot::Sender<PickerEvent>,
}

impl PickerDelegate {
    /// Create a delegate and the receiver the core awaits on.
    pub fn channel() -> (Self, PickerEventReceiver) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Report captured media.
    pub fn did_finish(self, media: CapturedMedia) {
        self.deliver(PickerEvent::Finished(media));
    }

    /// Report that the user cancelled.
    pub fn did_cancel(self) {
        self.deliver(PickerEvent::Cancelled);
    }

    /// Whether the core is still waiting for this delegate's event.
    pub fn is_waiting(&self) -> bool {
        !self.sender.is_closed()
    }

    fn deliver(self, event: PickerEvent) {
        // The core may have given up on the session (timeout, dropped future);
        // a late event is simply discarded.
        let _ = self.sender.send(event);
    }
}

/// Host-side picker presentation.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::picker::{PickerDelegate, PickerHost};
///
/// async fn present(host: &dyn PickerHost, request: PickerRequest) -> Result<()> {
///     let context = host.presentation_context().await.ok_or(...)?;
///     let (delegate, events) = PickerDelegate::channel();
///     host.present(&context, request, delegate).await?;
///     let event = events.await;
///     host.dismiss(&context).await
/// }
/// ```
#[async_trait]
pub trait PickerHost: Send + Sync {
    /// Whether the capture hardware for `source` exists on this device.
    fn is_source_available(&self, source: CaptureSource) -> bool;

    /// Media kinds the device can capture from `source`.
    fn available_media_types(&self, source: CaptureSource) -> Vec<MediaKind>;

    /// The top-most view able to present a modal, if any.
    async fn presentation_context(&self) -> Option<PresentationContext>;

    /// Present the picker modal. Returns once the modal is on screen; the
    /// outcome arrives later through `delegate`.
    async fn present(
        &self,
        context: &PresentationContext,
        request: PickerRequest,
        delegate: PickerDelegate,
    ) -> Result<()>;

    /// Dismiss the picker modal presented on `context`.
    async fn dismiss(&self, context: &PresentationContext) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageData;

    #[core_async::test]
    async fn test_delegate_delivers_finish() {
        let (delegate, receiver) = PickerDelegate::channel();
        let media = CapturedMedia::Image(ImageData::new(vec![1u8, 2, 3], 1, 1, "image/png"));

        delegate.did_finish(media.clone());

        assert_eq!(receiver.await.unwrap(), PickerEvent::Finished(media));
    }

    #[core_async::test]
    async fn test_delegate_delivers_cancel() {
        let (delegate, receiver) = PickerDelegate::channel();
        delegate.did_cancel();
        assert_eq!(receiver.await.unwrap(), PickerEvent::Cancelled);
    }

    #[core_async::test]
    async fn test_dropped_delegate_closes_channel() {
        let (delegate, receiver) = PickerDelegate::channel();
        drop(delegate);
        assert!(receiver.await.is_err());
    }

    #[test]
    fn test_late_event_after_receiver_dropped() {
        let (delegate, receiver) = PickerDelegate::channel();
        assert!(delegate.is_waiting());

        drop(receiver);

        assert!(!delegate.is_waiting());
        // Must not panic
        delegate.did_cancel();
    }
}
