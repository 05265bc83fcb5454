//! # Video Finishing Pipeline
//!
//! Decides what happens to a recorded movie after the picker hands over its
//! temporary file.
//!
//! | save_to_gallery | format  | result                                             |
//! |-----------------|---------|----------------------------------------------------|
//! | false           | Default | picker temp path, untouched                        |
//! | false           | Mp4     | transcoded file in documents, temp source removed  |
//! | true            | Default | temp file saved to gallery, temp path returned     |
//! | true            | Mp4     | transcoded file saved to gallery, then cleaned up  |
//!
//! Steps always run transcode, persist, cleanup, in that order. Cleanup
//! failures are logged and never change the outcome.

use crate::error::{CaptureError, Result};
use crate::options::VideoFormat;
use crate::result::MediaResult;
use crate::session::CaptureSession;
use bridge_traits::{
    Clock, ContainerFormat, ExportPreset, FileSystemAccess, MediaKind, PhotoLibrary,
    TranscodeRequest, VideoTranscoder,
};
use core_runtime::events::{CaptureEvent, CoreEvent, EventBus};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct VideoPipeline {
    library: Arc<dyn PhotoLibrary>,
    transcoder: Arc<dyn VideoTranscoder>,
    file_system: Arc<dyn FileSystemAccess>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    file_prefix: String,
}

impl VideoPipeline {
    pub fn new(
        library: Arc<dyn PhotoLibrary>,
        transcoder: Arc<dyn VideoTranscoder>,
        file_system: Arc<dyn FileSystemAccess>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
        file_prefix: impl Into<String>,
    ) -> Self {
        Self {
            library,
            transcoder,
            file_system,
            clock,
            event_bus,
            file_prefix: file_prefix.into(),
        }
    }

    /// Finish a video capture whose picker output sits at `source`.
    pub async fn finish(&self, session: &CaptureSession, source: PathBuf) -> Result<MediaResult> {
        let options = &session.options;

        match (options.save_to_gallery, options.video_format) {
            (false, VideoFormat::Default) => {
                debug!(session_id = %session.id, "Returning picker video as-is");
                Ok(MediaResult::VideoFile(source))
            }
            (true, VideoFormat::Default) => {
                self.persist(session, &source).await?;
                Ok(MediaResult::VideoFile(source))
            }
            (save_to_gallery, VideoFormat::Mp4) => {
                let output = match self.transcode(session, &source).await {
                    Ok(output) => output,
                    Err(e) => {
                        self.remove(session, &source).await;
                        return Err(e);
                    }
                };

                let persisted = if save_to_gallery {
                    self.persist(session, &output).await
                } else {
                    Ok(())
                };

                self.remove(session, &source).await;
                if save_to_gallery && !options.save_to_app_storage {
                    self.remove(session, &output).await;
                }

                persisted.map(|()| MediaResult::VideoFile(output))
            }
        }
    }

    async fn output_directory(&self, session: &CaptureSession) -> Result<PathBuf> {
        let documents = self.file_system.get_documents_directory().await?;
        let directory = match &session.options.save_subfolder {
            Some(folder) => documents.join(folder),
            None => documents,
        };
        self.file_system.create_dir_all(&directory).await?;
        Ok(directory)
    }

    async fn transcode(&self, session: &CaptureSession, source: &Path) -> Result<PathBuf> {
        let container = ContainerFormat::Mp4;
        let preset = if session.options.high_quality {
            ExportPreset::HighestQuality
        } else {
            ExportPreset::LowQuality
        };

        let file_name = format!(
            "{}{}.{}",
            self.file_prefix,
            self.clock.unix_timestamp_millis(),
            container.extension()
        );
        let destination = self.output_directory(session).await?.join(&file_name);

        let request = TranscodeRequest {
            source: source.to_path_buf(),
            destination: destination.clone(),
            container,
            preset,
        };

        info!(session_id = %session.id, preset = preset.as_str(), file = %file_name, "Transcoding video");

        if let Err(e) = self.transcoder.transcode(request).await {
            error!(session_id = %session.id, error = %e, "Video transcode failed");
            self.remove(session, &destination).await;
            return Err(CaptureError::Transcode(e.to_string()));
        }

        self.emit(CaptureEvent::Transcoded {
            session_id: session.id.to_string(),
            preset: preset.as_str().to_string(),
            file_name,
        });

        Ok(destination)
    }

    async fn persist(&self, session: &CaptureSession, path: &Path) -> Result<()> {
        if let Err(e) = self.library.save_video(path).await {
            error!(session_id = %session.id, error = %e, "Failed to save video to gallery");
            return Err(CaptureError::persistence(MediaKind::Video, e.to_string()));
        }

        debug!(session_id = %session.id, path = ?path, "Saved video to gallery");
        self.emit(CaptureEvent::SavedToGallery {
            session_id: session.id.to_string(),
            media_kind: MediaKind::Video.to_string(),
        });
        Ok(())
    }

    async fn remove(&self, session: &CaptureSession, path: &Path) {
        match self.file_system.remove_if_exists(path).await {
            Ok(true) => {
                debug!(session_id = %session.id, path = ?path, "Removed temporary file");
                self.emit(CaptureEvent::TempFileRemoved {
                    session_id: session.id.to_string(),
                    file_name: file_name(path),
                });
            }
            Ok(false) => {}
            Err(e) => {
                warn!(session_id = %session.id, path = ?path, error = %e, "Failed to remove temporary file");
            }
        }
    }

    fn emit(&self, event: CaptureEvent) {
        let _ = self.event_bus.emit(CoreEvent::Capture(event));
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
