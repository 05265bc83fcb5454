//! `mockall` doubles for the bridge traits, shared by unit tests.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::{
    AuthorizationState, CaptureSource, FileSystemAccess, GalleryAsset, ImageData, MediaKind,
    PhotoLibrary, PickerDelegate, PickerHost, PickerRequest, PresentationContext,
    TranscodeRequest, VideoTranscoder,
};
use mockall::mock;
use std::path::{Path, PathBuf};

mock! {
    pub Library {}

    #[async_trait]
    impl PhotoLibrary for Library {
        async fn authorization_status(&self) -> Result<AuthorizationState>;
        async fn request_authorization(&self) -> Result<AuthorizationState>;
        async fn save_image(&self, image: &ImageData) -> Result<()>;
        async fn save_video(&self, path: &Path) -> Result<()>;
        async fn fetch_latest(&self, kind: MediaKind) -> Result<Option<GalleryAsset>>;
    }
}

mock! {
    pub Transcoder {}

    #[async_trait]
    impl VideoTranscoder for Transcoder {
        async fn transcode(&self, request: TranscodeRequest) -> Result<()>;
    }
}

mock! {
    pub FileSystem {}

    #[async_trait]
    impl FileSystemAccess for FileSystem {
        async fn get_documents_directory(&self) -> Result<PathBuf>;
        async fn exists(&self, path: &Path) -> Result<bool>;
        async fn create_dir_all(&self, path: &Path) -> Result<()>;
        async fn delete_file(&self, path: &Path) -> Result<()>;
    }
}

mock! {
    pub Picker {}

    #[async_trait]
    impl PickerHost for Picker {
        fn is_source_available(&self, source: CaptureSource) -> bool;
        fn available_media_types(&self, source: CaptureSource) -> Vec<MediaKind>;
        async fn presentation_context(&self) -> Option<PresentationContext>;
        async fn present(
            &self,
            context: &PresentationContext,
            request: PickerRequest,
            delegate: PickerDelegate,
        ) -> Result<()>;
        async fn dismiss(&self, context: &PresentationContext) -> Result<()>;
    }
}
