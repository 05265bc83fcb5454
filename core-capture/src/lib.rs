//! # Capture Core Module
//!
//! Sequences the native camera picker, photo library and video transcoder
//! into a single asynchronous `take_picture` call.
//!
//! ## Overview
//!
//! This module manages:
//! - Caller option resolution and validation
//! - Photo library authorization checks with gallery-save downgrade
//! - Capture sessions with a settle-once completion handle
//! - Still image results with gallery round-trip and timestamp sanity check
//! - Video finishing (transcode, persist, temporary file cleanup)
//! - Strict EXIF `DateTimeOriginal` parsing
//!
//! ## Usage
//!
//! ```ignore
//! use core_capture::{CaptureCoordinator, CaptureOptionsInput, VideoFormat};
//!
//! let coordinator = CaptureCoordinator::new(&config);
//! let input = CaptureOptionsInput::new().format(VideoFormat::Mp4);
//! match coordinator.take_picture(Some(input)).await {
//!     Ok(result) => println!("captured {}", result.kind()),
//!     Err(e) if e.is_cancelled() => println!("user cancelled"),
//!     Err(e) => eprintln!("capture failed: {e}"),
//! }
//! ```

pub mod assembler;
pub mod authorization;
pub mod controller;
pub mod error;
pub mod exif;
pub mod options;
pub mod result;
pub mod session;
pub mod video;

#[cfg(test)]
mod mocks;

pub use controller::CaptureCoordinator;
pub use error::{CaptureError, Result};
pub use exif::{parse_exif_datetime, ExifDateError};
pub use options::{CaptureOptions, CaptureOptionsInput, ResizeHints, VideoFormat};
pub use result::{ImageAsset, ImageSource, MediaResult};
pub use session::{CaptureOutcome, SessionId, SessionState};
