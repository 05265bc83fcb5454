//! # Event Bus System
//!
//! Broadcast channel over which capture sessions report what they are doing.
//! Hosts subscribe to drive UI (spinners while transcoding, toasts on gallery
//! save) and tests subscribe to observe non-fatal conditions such as the
//! gallery timestamp skew warning.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   emit    ┌──────────┐   subscribe   ┌────────────┐
//! │ CaptureCoordinator├─────────>│ EventBus ├──────────────>│ Host UI    │
//! └──────────────────┘           │(broadcast│               └────────────┘
//! ┌──────────────────┐   emit    │ channel) │   subscribe   ┌────────────┐
//! │ AuthorizationGate├─────────> │          ├──────────────>│ Telemetry  │
//! └──────────────────┘           └──────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CaptureEvent, CoreEvent, EventBus};
//!
//! # #[core_async::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(CoreEvent::Capture(CaptureEvent::PickerPresented {
//!     session_id: "3f1c".to_string(),
//! }))
//! .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.description(), "Picker presented");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events; it can keep
//!   receiving.
//! - **`RecvError::Closed`**: every sender is gone; treat as shutdown.
//!
//! Emitting with no subscribers returns `Err`. The capture core ignores that
//! error; events are informational.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Capture session lifecycle
    Capture(CaptureEvent),
    /// Photo library permission outcomes
    Permission(PermissionEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Capture(e) => e.description(),
            CoreEvent::Permission(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Capture(CaptureEvent::SessionSettled { outcome, .. }) => match outcome {
                SessionOutcome::Failed => EventSeverity::Error,
                SessionOutcome::Cancelled => EventSeverity::Info,
                SessionOutcome::Succeeded => EventSeverity::Info,
            },
            CoreEvent::Capture(CaptureEvent::TimestampSkew { .. }) => EventSeverity::Warning,
            CoreEvent::Capture(CaptureEvent::GallerySaveDowngraded { .. }) => {
                EventSeverity::Warning
            }
            CoreEvent::Permission(PermissionEvent::StatusResolved { authorized: false, .. }) => {
                EventSeverity::Warning
            }
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Capture Events
// ============================================================================

/// Terminal outcome of a capture session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionOutcome {
    Succeeded,
    Cancelled,
    Failed,
}

/// Events emitted over the life of one capture session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CaptureEvent {
    /// Options resolved and session created.
    SessionStarted {
        session_id: String,
        save_to_gallery: bool,
    },
    /// Gallery save was requested but authorization is missing.
    GallerySaveDowngraded {
        /// Authorization state that caused the downgrade
        authorization: String,
    },
    /// Picker modal is on screen.
    PickerPresented { session_id: String },
    /// The picker delivered media.
    MediaCaptured {
        session_id: String,
        /// "image" or "video"
        media_kind: String,
    },
    /// Media was written to the gallery.
    SavedToGallery {
        session_id: String,
        media_kind: String,
    },
    /// A video was re-encoded.
    Transcoded {
        session_id: String,
        preset: String,
        /// Output file name (no directory)
        file_name: String,
    },
    /// The fetched gallery asset was created further from the session start
    /// than the tolerance allows.
    TimestampSkew {
        session_id: String,
        skew_ms: i64,
        tolerance_ms: i64,
    },
    /// A temporary file was cleaned up.
    TempFileRemoved {
        session_id: String,
        file_name: String,
    },
    /// The session's result was delivered.
    SessionSettled {
        session_id: String,
        outcome: SessionOutcome,
    },
}

impl CaptureEvent {
    fn description(&self) -> &str {
        match self {
            CaptureEvent::SessionStarted { .. } => "Capture session started",
            CaptureEvent::GallerySaveDowngraded { .. } => {
                "Gallery save disabled: photo library not authorized"
            }
            CaptureEvent::PickerPresented { .. } => "Picker presented",
            CaptureEvent::MediaCaptured { .. } => "Media captured",
            CaptureEvent::SavedToGallery { .. } => "Saved to gallery",
            CaptureEvent::Transcoded { .. } => "Video transcoded",
            CaptureEvent::TimestampSkew { .. } => "Gallery asset timestamp outside tolerance",
            CaptureEvent::TempFileRemoved { .. } => "Temporary file removed",
            CaptureEvent::SessionSettled { .. } => "Capture session settled",
        }
    }
}

// ============================================================================
// Permission Events
// ============================================================================

/// Events describing photo library permission outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PermissionEvent {
    /// A permission prompt was shown to the user.
    Prompted,
    /// The authorization state after `request_permissions`.
    StatusResolved { state: String, authorized: bool },
}

impl PermissionEvent {
    fn description(&self) -> &str {
        match self {
            PermissionEvent::Prompted => "Photo library permission prompted",
            PermissionEvent::StatusResolved {
                authorized: true, ..
            } => "Application can access photo library assets",
            PermissionEvent::StatusResolved {
                authorized: false, ..
            } => "Application can not access photo library assets",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the given buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let captures_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Capture(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Receives a buffered event without waiting.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every buffered matching event.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(Ok(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(outcome: SessionOutcome) -> CoreEvent {
        CoreEvent::Capture(CaptureEvent::SessionSettled {
            session_id: "session-1".to_string(),
            outcome,
        })
    }

    #[test]
    fn test_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(settled(SessionOutcome::Succeeded)).is_err());
    }

    #[core_async::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = CoreEvent::Capture(CaptureEvent::MediaCaptured {
            session_id: "session-1".to_string(),
            media_kind: "video".to_string(),
        });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[core_async::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Permission(_)));

        bus.emit(settled(SessionOutcome::Cancelled)).ok();
        let permission = CoreEvent::Permission(PermissionEvent::Prompted);
        bus.emit(permission.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), permission);
    }

    #[test]
    fn test_drain_collects_buffered_events() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());

        bus.emit(settled(SessionOutcome::Succeeded)).ok();
        bus.emit(settled(SessionOutcome::Failed)).ok();

        assert_eq!(stream.drain().len(), 2);
        assert!(stream.try_recv().is_none());
    }

    #[core_async::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for _ in 0..5 {
            bus.emit(settled(SessionOutcome::Succeeded)).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(settled(SessionOutcome::Failed).severity(), EventSeverity::Error);
        assert_eq!(settled(SessionOutcome::Cancelled).severity(), EventSeverity::Info);

        let skew = CoreEvent::Capture(CaptureEvent::TimestampSkew {
            session_id: "s".to_string(),
            skew_ms: 1500,
            tolerance_ms: 1000,
        });
        assert_eq!(skew.severity(), EventSeverity::Warning);

        let denied = CoreEvent::Permission(PermissionEvent::StatusResolved {
            state: "denied".to_string(),
            authorized: false,
        });
        assert_eq!(denied.severity(), EventSeverity::Warning);
        assert_eq!(
            denied.description(),
            "Application can not access photo library assets"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Capture(CaptureEvent::Transcoded {
            session_id: "session-9".to_string(),
            preset: "highest_quality".to_string(),
            file_name: "videoCapture_1700000000000.mp4".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Capture\""));
        assert!(json.contains("videoCapture_1700000000000.mp4"));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }
}
