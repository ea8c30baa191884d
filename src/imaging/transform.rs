//! The five resize strategies, applied to a decoded image.
//!
//! Dimension math comes from [`calculations`](super::calculations); the
//! resampling itself is `image::DynamicImage::resize_exact` with the
//! requested [`ResampleFilter`].

use super::calculations::{
    CropAnchor, calculate_contain_dimensions, calculate_crop_origin, calculate_fill_dimensions,
    calculate_pad_offset, calculate_thumbnail_dimensions,
};
use super::params::{PadColor, ResampleFilter, ResizeMode, TargetSize};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};

fn resize_to(img: &DynamicImage, dims: (u32, u32), filter: ResampleFilter) -> DynamicImage {
    if img.dimensions() == dims {
        return img.clone();
    }
    img.resize_exact(dims.0, dims.1, filter.filter_type())
}

/// Shrink to fit inside the box; a source already inside is returned unchanged.
pub fn thumbnail(img: &DynamicImage, size: TargetSize, filter: ResampleFilter) -> DynamicImage {
    let dims = calculate_thumbnail_dimensions(img.dimensions(), size.as_tuple());
    resize_to(img, dims, filter)
}

/// Scale up or down so the whole image fits inside the box.
pub fn contain(img: &DynamicImage, size: TargetSize, filter: ResampleFilter) -> DynamicImage {
    let dims = calculate_contain_dimensions(img.dimensions(), size.as_tuple());
    resize_to(img, dims, filter)
}

fn fill_and_crop(
    img: &DynamicImage,
    size: TargetSize,
    filter: ResampleFilter,
    anchor: CropAnchor,
) -> DynamicImage {
    let target = size.as_tuple();
    let filled_dims = calculate_fill_dimensions(img.dimensions(), target);
    let filled = resize_to(img, filled_dims, filter);
    let (x, y) = calculate_crop_origin(filled_dims, target, anchor);
    filled.crop_imm(x, y, target.0, target.1)
}

/// Fill the box and crop the excess from the top-left corner.
pub fn cover(img: &DynamicImage, size: TargetSize, filter: ResampleFilter) -> DynamicImage {
    fill_and_crop(img, size, filter, CropAnchor::TopLeft)
}

/// Fill the box and crop the excess evenly on both sides.
pub fn fit(img: &DynamicImage, size: TargetSize, filter: ResampleFilter) -> DynamicImage {
    fill_and_crop(img, size, filter, CropAnchor::Center)
}

/// Contain inside the box, then center on an RGBA canvas of `color`.
///
/// The scaled image replaces the canvas pixels (no blending), so transparent
/// source pixels stay transparent.
pub fn pad(
    img: &DynamicImage,
    size: TargetSize,
    filter: ResampleFilter,
    color: PadColor,
) -> DynamicImage {
    let inner = contain(img, size, filter).to_rgba8();
    let mut canvas = RgbaImage::from_pixel(size.width, size.height, Rgba(color.0));
    let (x, y) = calculate_pad_offset(inner.dimensions(), size.as_tuple());
    imageops::replace(&mut canvas, &inner, x as i64, y as i64);
    DynamicImage::ImageRgba8(canvas)
}

/// Dispatch to the strategy named by `mode`.
pub fn apply(
    img: &DynamicImage,
    mode: ResizeMode,
    size: TargetSize,
    filter: ResampleFilter,
    pad_color: PadColor,
) -> DynamicImage {
    match mode {
        ResizeMode::Thumbnail => thumbnail(img, size, filter),
        ResizeMode::Contain => contain(img, size, filter),
        ResizeMode::Cover => cover(img, size, filter),
        ResizeMode::Fit => fit(img, size, filter),
        ResizeMode::Pad => pad(img, size, filter, pad_color),
    }
}
