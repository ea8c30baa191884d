//! Shared test utilities for the kiyanka test suite.
//!
//! Synthetic image writers so tests never depend on binary fixtures.

use image::{ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// Gradient pixel so resampled output is not trivially uniform.
fn gradient(x: u32, y: u32) -> [u8; 3] {
    [(x % 256) as u8, (y % 256) as u8, 128]
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb(gradient(x, y)));
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create an opaque RGB PNG (no alpha channel).
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb(gradient(x, y)))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Create an RGBA PNG whose left half is transparent.
///
/// Always PNG-encoded, whatever the file extension.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = gradient(x, y);
        Rgba([r, g, b, if x < width / 2 { 0 } else { 255 }])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}
