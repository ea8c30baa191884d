//! Background segmentation.
//!
//! The network itself is a black box behind the [`Segmenter`] trait: it
//! takes a decoded image and returns a grayscale foreground mask at the same
//! size (255 = foreground). Everything after the mask lives here:
//!
//! ```text
//! image ─► Segmenter::predict_mask ─► refine (hard | soft) ─► cut out ─► [over background color]
//! ```
//!
//! - **Hard edge** binarizes the mask at 50%.
//! - **Soft edge** runs the alpha-matting pass in [`matting`], giving graded
//!   transparency along the subject's outline.
//!
//! The production segmenter is [`OnnxSegmenter`].

pub mod matting;
pub mod onnx;

pub use onnx::OnnxSegmenter;

use crate::imaging::{AlphaMatting, EdgeMode, PadColor};
use image::{DynamicImage, GrayImage, RgbaImage};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SegmentationError {
    #[error("Cannot load model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Model returned an unusable mask: {0}")]
    InvalidOutput(String),
}

/// A model that predicts a foreground mask.
pub trait Segmenter {
    /// Predict a foreground mask with the same dimensions as `image`.
    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage, SegmentationError>;
}

/// How to turn a mask into the final cut-out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RemovalOptions {
    pub edge: EdgeMode,
    pub matting: AlphaMatting,
    pub background_color: Option<PadColor>,
}

/// Remove the background of `image`.
///
/// Always returns RGBA. With a background color the result is the cut-out
/// composited over that color.
pub fn remove(
    segmenter: &dyn Segmenter,
    image: &DynamicImage,
    options: &RemovalOptions,
) -> Result<RgbaImage, SegmentationError> {
    let mask = segmenter.predict_mask(image)?;
    if mask.dimensions() != (image.width(), image.height()) {
        return Err(SegmentationError::InvalidOutput(format!(
            "mask is {}x{}, image is {}x{}",
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        )));
    }

    let alpha = match options.edge {
        EdgeMode::Hard => matting::binarize(&mask),
        EdgeMode::Soft => {
            debug!(
                "Alpha matting: fg>{} bg<{} erode={} base={}",
                options.matting.foreground_threshold,
                options.matting.background_threshold,
                options.matting.erode_size,
                options.matting.base_size
            );
            matting::estimate_alpha(&mask, &options.matting)
        }
    };

    let cutout = matting::apply_alpha(image, &alpha);
    Ok(match options.background_color {
        Some(color) => matting::composite_over(&cutout, color),
        None => cutout,
    })
}
