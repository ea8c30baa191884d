//! Mask refinement and compositing.
//!
//! The alpha-matting pass is a trimap approximation:
//!
//! 1. Work on a copy of the mask capped to `base_size` on its long edge.
//! 2. Split it into definite foreground (`> foreground_threshold`), definite
//!    background (`< background_threshold`) and an unknown band.
//! 3. Erode both definite regions by `erode_size`, widening the band.
//! 4. Inside the band, alpha is the box-filtered mask; outside it is 0 or 255.
//! 5. Scale the alpha back to the source size.

use crate::imaging::calculations::calculate_capped_dimensions;
use crate::imaging::{AlphaMatting, PadColor};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::box_filter;
use imageproc::morphology::erode;

const HALF: u8 = 128;

/// Hard edge: every pixel fully in or fully out.
pub fn binarize(mask: &GrayImage) -> GrayImage {
    threshold(mask, |v| v >= HALF)
}

fn threshold(mask: &GrayImage, keep: impl Fn(u8) -> bool) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        Luma([if keep(mask.get_pixel(x, y).0[0]) { 255 } else { 0 }])
    })
}

/// Soft edge: graded alpha along the foreground boundary.
pub fn estimate_alpha(mask: &GrayImage, matting: &AlphaMatting) -> GrayImage {
    let original = mask.dimensions();
    let working_dims = calculate_capped_dimensions(original, matting.base_size.max(1));
    let working = if working_dims == original {
        mask.clone()
    } else {
        imageops::resize(mask, working_dims.0, working_dims.1, FilterType::Triangle)
    };

    let mut foreground = threshold(&working, |v| v > matting.foreground_threshold);
    let mut background = threshold(&working, |v| v < matting.background_threshold);
    if matting.erode_size > 0 {
        foreground = erode(&foreground, Norm::LInf, matting.erode_size);
        background = erode(&background, Norm::LInf, matting.erode_size);
    }

    let radius = u32::from(matting.erode_size.max(1));
    let smoothed = box_filter(&working, radius, radius);

    let alpha = GrayImage::from_fn(working_dims.0, working_dims.1, |x, y| {
        if foreground.get_pixel(x, y).0[0] == 255 {
            Luma([255])
        } else if background.get_pixel(x, y).0[0] == 255 {
            Luma([0])
        } else {
            *smoothed.get_pixel(x, y)
        }
    });

    if working_dims == original {
        alpha
    } else {
        imageops::resize(&alpha, original.0, original.1, FilterType::Triangle)
    }
}

/// Use `alpha` as the transparency of `image`, keeping any existing transparency.
pub fn apply_alpha(image: &DynamicImage, alpha: &GrayImage) -> RgbaImage {
    let mut out = image.to_rgba8();
    for (pixel, mask) in out.pixels_mut().zip(alpha.pixels()) {
        let combined = u16::from(pixel.0[3]) * u16::from(mask.0[0]) / 255;
        pixel.0[3] = combined as u8;
    }
    out
}

/// Alpha-blend `cutout` over a solid canvas of `color`.
pub fn composite_over(cutout: &RgbaImage, color: PadColor) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(cutout.width(), cutout.height(), Rgba(color.0));
    imageops::overlay(&mut canvas, cutout, 0, 0);
    canvas
}
