//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the I/O every backend must support:
//! read raw bytes, decode from a path or from memory, and encode to a path.
//! The resize strategies themselves live in [`transform`](super::transform)
//! and operate on decoded images, so they are backend-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust, built on
//! the `image` crate.

use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Trait for image codec backends.
///
/// Every backend must implement all four operations so the dispatchers in
/// [`operations`](super::operations) never touch the filesystem directly.
pub trait ImageBackend {
    /// Read a file fully into memory.
    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError>;

    /// Decode an image file.
    fn open(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Decode an image already in memory.
    fn open_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path`, format chosen by the path's extension.
    /// Creates or overwrites the file.
    fn save(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError>;
}
