//! Video Transcoding Abstraction
//!
//! Re-encoding is always delegated to a host encoder (AVFoundation export
//! sessions, MediaCodec, ffmpeg). The core only decides whether to transcode,
//! which preset to use, and where the output goes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerFormat {
    Mp4,
}

impl ContainerFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => "mp4",
        }
    }
}

/// Quality profile for the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportPreset {
    HighestQuality,
    LowQuality,
}

impl ExportPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportPreset::HighestQuality => "highest_quality",
            ExportPreset::LowQuality => "low_quality",
        }
    }
}

/// One transcode job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    pub source: PathBuf,
    /// Output file path; its parent directory already exists
    pub destination: PathBuf,
    pub container: ContainerFormat,
    pub preset: ExportPreset,
}

/// Asynchronous video encoder.
#[async_trait]
pub trait VideoTranscoder: Send + Sync {
    /// Encode `request.source` into `request.destination`.
    ///
    /// Resolves once the output file is complete. There is no cancellation;
    /// a started job always runs to completion or failure.
    async fn transcode(&self, request: TranscodeRequest) -> Result<()>;
}
