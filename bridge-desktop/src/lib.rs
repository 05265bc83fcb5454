//! # Desktop Bridge Implementations
//!
//! Default implementations of the storage-side bridge traits for desktop
//! platforms (macOS, Windows, Linux):
//! - `FileSystemAccess` using `tokio::fs` and the user documents directory
//! - `PhotoLibrary` backed by a pictures folder
//!
//! Desktop hosts still provide their own `PickerHost` and `VideoTranscoder`,
//! since those wrap a UI toolkit and an encoder respectively.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DirectoryPhotoLibrary, TokioFileSystem};
//!
//! let fs = TokioFileSystem::new();
//! let gallery = DirectoryPhotoLibrary::new();
//! ```

mod filesystem;
mod gallery;

pub use filesystem::TokioFileSystem;
pub use gallery::DirectoryPhotoLibrary;
