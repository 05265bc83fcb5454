//! # Capture Session
//!
//! Per-invocation session state, the settle-once completion handle and the
//! single-session slot.
//!
//! ## State Machine
//!
//! ```text
//! Idle → Presented → Finishing → Settled
//!   │        │                      ↑
//!   └────────┴──────────────────────┘
//! ```
//!
//! Any unsettled state may settle directly (no presentation context, picker
//! cancelled, timeout). `Settled` is terminal.

use crate::error::{CaptureError, Result};
use crate::options::CaptureOptions;
use crate::result::MediaResult;
use chrono::{DateTime, Utc};
use core_async::sync::oneshot;
use std::fmt;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// What a session settles with.
pub type CaptureOutcome = Result<MediaResult>;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Session State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, picker not yet on screen
    Idle,
    /// Picker modal presented, waiting for the user
    Presented,
    /// Media received, persistence/transcoding in progress
    Finishing,
    /// Result delivered
    Settled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Presented => "presented",
            SessionState::Finishing => "finishing",
            SessionState::Settled => "settled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Settled)
    }

    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (*self, next),
            (Idle, Presented) | (Presented, Finishing) | (Idle | Presented | Finishing, Settled)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Completion Handle
// ============================================================================

/// Receiving side of a [`CompletionHandle`].
pub type CompletionReceiver = oneshot::Receiver<CaptureOutcome>;

/// Delivers a session's outcome exactly once.
///
/// The sender is taken out of the `Option` under the lock, so only the first
/// `settle` call can ever deliver.
pub struct CompletionHandle {
    session_id: SessionId,
    sender: Mutex<Option<oneshot::Sender<CaptureOutcome>>>,
}

impl CompletionHandle {
    pub fn new(session_id: SessionId) -> (Self, CompletionReceiver) {
        let (sender, receiver) = oneshot::channel();
        let handle = Self {
            session_id,
            sender: Mutex::new(Some(sender)),
        };
        (handle, receiver)
    }

    /// Deliver `outcome`. Returns `true` only for the first call.
    pub fn settle(&self, outcome: CaptureOutcome) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match sender {
            Some(sender) => {
                if sender.send(outcome).is_err() {
                    debug!(session_id = %self.session_id, "Caller stopped waiting before settle");
                }
                true
            }
            None => {
                debug!(session_id = %self.session_id, "Ignoring repeated settle");
                false
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

/// Wait for the outcome delivered through `receiver`.
///
/// A handle dropped without settling yields [`CaptureError::Internal`].
pub async fn await_outcome(receiver: CompletionReceiver) -> CaptureOutcome {
    receiver.await.unwrap_or_else(|_| {
        Err(CaptureError::Internal(
            "capture session dropped without settling".to_string(),
        ))
    })
}

impl fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("session_id", &self.session_id)
            .field("settled", &self.is_settled())
            .finish()
    }
}

// ============================================================================
// Capture Session
// ============================================================================

/// One `take_picture` invocation.
#[derive(Debug)]
pub struct CaptureSession {
    pub id: SessionId,
    pub options: CaptureOptions,
    pub created_at: DateTime<Utc>,
    media_received_at: Option<DateTime<Utc>>,
    state: SessionState,
    completion: CompletionHandle,
}

impl CaptureSession {
    pub fn new(
        id: SessionId,
        options: CaptureOptions,
        created_at: DateTime<Utc>,
    ) -> (Self, CompletionReceiver) {
        let (completion, receiver) = CompletionHandle::new(id);
        let session = Self {
            id,
            options,
            created_at,
            media_received_at: None,
            state: SessionState::Idle,
            completion,
        };
        (session, receiver)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Record when the picker handed over media.
    pub fn record_media_received(&mut self, at: DateTime<Utc>) {
        self.media_received_at = Some(at);
    }

    /// Moment a gallery asset created for this session should be close to.
    ///
    /// The time media arrived from the picker, or the session start if no
    /// media has arrived yet.
    pub fn capture_reference(&self) -> DateTime<Utc> {
        self.media_received_at.unwrap_or(self.created_at)
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidStateTransition`] for transitions the
    /// state machine does not allow.
    pub fn transition(&mut self, next: SessionState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(CaptureError::InvalidStateTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        debug!(session_id = %self.id, from = %self.state, to = %next, "Session state change");
        self.state = next;
        Ok(())
    }

    /// Move to `Settled` and deliver `outcome`.
    ///
    /// Returns `false` (and drops `outcome`) if the session already settled.
    pub fn settle(&mut self, outcome: CaptureOutcome) -> bool {
        if self.state.is_terminal() {
            debug!(session_id = %self.id, "Session already settled");
            return false;
        }
        self.state = SessionState::Settled;
        self.completion.settle(outcome)
    }
}

// ============================================================================
// Session Slot
// ============================================================================

/// Admits at most one in-flight session.
#[derive(Debug, Default)]
pub struct SessionSlot {
    active: Mutex<Option<SessionId>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `session_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CaptureInProgress`] naming the active session
    /// if the slot is taken.
    pub fn claim(&self, session_id: SessionId) -> Result<SlotGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = *active {
            return Err(CaptureError::CaptureInProgress {
                active_session: current.to_string(),
            });
        }
        *active = Some(session_id);
        Ok(SlotGuard {
            slot: self,
            session_id,
        })
    }

    pub fn active_session(&self) -> Option<SessionId> {
        *self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_busy(&self) -> bool {
        self.active_session().is_some()
    }
}

/// Releases the slot when dropped.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    slot: &'a SessionSlot,
    session_id: SessionId,
}

impl SlotGuard<'_> {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.slot.active.lock().unwrap_or_else(|e| e.into_inner());
        if *active == Some(self.session_id) {
            *active = None;
            debug!(session_id = %self.session_id, "Session slot released");
        }
    }
}
