use bridge_traits::{BridgeError, MediaKind};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No view is available to present the picker")]
    NoPresentationContext,

    #[error("Capture session {active_session} already in progress")]
    CaptureInProgress { active_session: String },

    #[error("Capture cancelled by user")]
    Cancelled,

    #[error("Picker closed without delivering a result")]
    PickerClosed,

    #[error("Failed to save {media_kind} to gallery: {message}")]
    Persistence {
        media_kind: MediaKind,
        message: String,
    },

    #[error("Video transcode failed: {0}")]
    Transcode(String),

    #[error("Invalid capture options: {0}")]
    InvalidOptions(String),

    #[error("Capture session timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Invalid session state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaptureError {
    /// Whether the user dismissed the picker.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CaptureError::Cancelled)
    }

    pub(crate) fn persistence(media_kind: MediaKind, message: impl Into<String>) -> Self {
        CaptureError::Persistence {
            media_kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;
