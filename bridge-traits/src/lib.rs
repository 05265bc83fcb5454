//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the capture core and the native
//! services it sequences. The core never touches a camera, a photo library or
//! an encoder directly; each of those is a capability the host hands in.
//!
//! ## Traits
//!
//! ### Capture
//! - [`PickerHost`](picker::PickerHost) - Presents the native still/video picker modal
//! - [`PhotoLibrary`](gallery::PhotoLibrary) - Gallery authorization, persistence and recency fetch
//! - [`VideoTranscoder`](transcode::VideoTranscoder) - Re-encodes captured video into a target container
//!
//! ### Storage
//! - [`FileSystemAccess`](storage::FileSystemAccess) - App document storage and file removal
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Filesystem + folder gallery |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert native errors into it with enough context (paths, asset
//! identifiers) for the core to log something actionable.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`. Native completion callbacks may
//! arrive on arbitrary threads; the picker delegate is itself `Send`.
//!
//! ## Examples
//!
//! ### Implementing VideoTranscoder
//!
//! ```ignore
//! use bridge_traits::transcode::{TranscodeRequest, VideoTranscoder};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct AvFoundationTranscoder;
//!
//! #[async_trait]
//! impl VideoTranscoder for AvFoundationTranscoder {
//!     async fn transcode(&self, request: TranscodeRequest) -> Result<()> {
//!         // Start an export session and await its completion handler
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod gallery;
pub mod media;
pub mod picker;
pub mod storage;
pub mod time;
pub mod transcode;

pub use error::BridgeError;

// Re-export commonly used types
pub use gallery::{AuthorizationState, PhotoLibrary};
pub use media::{CapturedMedia, GalleryAsset, ImageData, MediaKind};
pub use picker::{
    CaptureSource, PickerDelegate, PickerEvent, PickerEventReceiver, PickerHost, PickerRequest,
    PresentationContext, PresentationStyle,
};
pub use storage::FileSystemAccess;
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
pub use transcode::{ContainerFormat, ExportPreset, TranscodeRequest, VideoTranscoder};
