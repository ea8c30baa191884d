//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, BMP) | `image::ImageReader` with content sniffing |
//! | Decode from memory | `image::load_from_memory` |
//! | Encode | `DynamicImage::save_with_format`, format from the output extension |

use super::backend::{BackendError, ImageBackend};
use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(e) => BackendError::Io(e),
        other => BackendError::Decode(other.to_string()),
    }
}

/// Convert to a pixel layout the target encoder accepts.
///
/// JPEG has no alpha channel, so transparent images are flattened to RGB.
/// Everything else is normalized to 8-bit RGB or RGBA.
fn prepare_for_format(img: &DynamicImage, format: ImageFormat) -> DynamicImage {
    match (format, img.color()) {
        (ImageFormat::Jpeg, ColorType::L8 | ColorType::Rgb8) => img.clone(),
        (ImageFormat::Jpeg, _) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (_, ColorType::Rgb8 | ColorType::Rgba8) => img.clone(),
        (_, color) if color.has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

impl ImageBackend for RustBackend {
    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError> {
        Ok(std::fs::read(path)?)
    }

    fn open(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(decode_error)
    }

    fn open_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes).map_err(decode_error)
    }

    fn save(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
        let format = ImageFormat::from_path(path)
            .map_err(|_| BackendError::UnsupportedFormat(path.display().to_string()))?;
        if !format.writing_enabled() {
            return Err(BackendError::UnsupportedFormat(format!("{format:?}")));
        }

        prepare_for_format(image, format)
            .save_with_format(path, format)
            .map_err(|e| match e {
                ImageError::IoError(io) => BackendError::Io(io),
                other => BackendError::Encode(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_jpeg, create_test_png, create_test_png_rgba};

    #[test]
    fn open_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let img = RustBackend::new().open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (200, 150));
        assert!(!img.color().has_alpha());
    }

    #[test]
    fn open_sniffs_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("really-a-png.jpg");
        create_test_png_rgba(&path, 40, 30);

        let img = RustBackend::new().open(&path).unwrap();
        assert!(img.color().has_alpha());
    }

    #[test]
    fn every_writable_extension_encodes_opaque_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 24, 18);

        let backend = RustBackend::new();
        let img = backend.open(&source).unwrap();
        for ext in ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"] {
            let output = tmp.path().join(format!("out.{ext}"));
            backend.save(&img, &output).unwrap();
            assert_eq!(backend.open(&output).unwrap().width(), 24, "{ext}");
        }
    }

    #[test]
    fn open_nonexistent_file_is_io_error() {
        let result = RustBackend::new().open(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn open_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = RustBackend::new().open(&path);
        assert!(result.is_err());
    }

    #[test]
    fn open_bytes_matches_open() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        create_test_png_rgba(&path, 64, 48);

        let backend = RustBackend::new();
        let bytes = backend.read(&path).unwrap();
        let img = backend.open_bytes(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn save_rgba_as_jpeg_flattens() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("flat.jpg");

        let backend = RustBackend::new();
        backend
            .save(&DynamicImage::new_rgba8(32, 16), &output)
            .unwrap();

        let reopened = backend.open(&output).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (32, 16));
        assert!(!reopened.color().has_alpha());
    }

    #[test]
    fn save_png_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("alpha.png");

        let backend = RustBackend::new();
        backend
            .save(&DynamicImage::new_rgba8(10, 10), &output)
            .unwrap();

        assert!(backend.open(&output).unwrap().color().has_alpha());
    }

    #[test]
    fn save_overwrites_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        std::fs::write(&output, b"old").unwrap();

        let backend = RustBackend::new();
        backend
            .save(&DynamicImage::new_rgb8(12, 12), &output)
            .unwrap();
        assert_eq!(backend.open(&output).unwrap().width(), 12);
    }

    #[test]
    fn save_unknown_extension_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.xyz");

        let result = RustBackend::new().save(&DynamicImage::new_rgb8(4, 4), &output);
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
        assert!(!output.exists());
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let result = RustBackend::new().save(
            &DynamicImage::new_rgb8(4, 4),
            Path::new("/nonexistent/dir/out.png"),
        );
        assert!(result.is_err());
    }
}
