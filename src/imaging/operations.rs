//! High-level image operations.
//!
//! Each dispatcher opens its source through an [`ImageBackend`], does the
//! work, and returns a [`ResultImage`] that already knows where it will be
//! written. [`save_image`] consumes that value; the `process_*` functions
//! chain the two.
//!
//! ```text
//! ResizeRequest               ─► resize_image        ─┐
//!                                                      ├─► ResultImage ─► save_image ─► PathBuf
//! BackgroundRemovalRequest    ─► remove_background   ─┘
//! ```
//!
//! Failures are [`ProcessError`] values naming the file and the reason;
//! nothing here panics on bad input.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fill_dimensions;
use super::params::{BackgroundRemovalRequest, ResizeMode, ResizeRequest, exceeds_pixel_budget};
use super::transform;
use crate::naming;
use crate::segmentation::{self, RemovalOptions, SegmentationError, Segmenter};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Cannot remove background of {path}: {source}")]
    Segmentation {
        path: PathBuf,
        #[source]
        source: SegmentationError,
    },
    #[error("File NOT saved to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Cannot resize {path}: the intermediate image would be {width}x{height}")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("Result image has no output path")]
    MissingOutputPath,
}

impl ProcessError {
    /// The file the failure is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ProcessError::Open { path, .. }
            | ProcessError::Read { path, .. }
            | ProcessError::Segmentation { path, .. }
            | ProcessError::Save { path, .. }
            | ProcessError::TooLarge { path, .. } => Some(path),
            ProcessError::MissingOutputPath => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;

/// A processed image and the path it is destined for.
///
/// Built once by a dispatcher and consumed by [`save_image`].
#[derive(Debug, Clone)]
pub struct ResultImage {
    image: DynamicImage,
    output_path: PathBuf,
}

impl ResultImage {
    pub fn new(image: DynamicImage, output_path: impl Into<PathBuf>) -> Self {
        Self {
            image,
            output_path: output_path.into(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Resize the request's source with its mode and compute the output path.
pub fn resize_image(backend: &dyn ImageBackend, request: &ResizeRequest) -> Result<ResultImage> {
    let source = backend
        .open(&request.source)
        .map_err(|source| ProcessError::Open {
            path: request.source.clone(),
            source,
        })?;
    info!(
        "Imported image: {}, {}x{}, {:?}",
        request.source.display(),
        source.width(),
        source.height(),
        source.color()
    );

    // Cover and fit scale past the box before cropping; an extreme aspect
    // ratio makes that intermediate far larger than the box itself.
    if matches!(request.mode, ResizeMode::Cover | ResizeMode::Fit) {
        let (width, height) = calculate_fill_dimensions(
            (source.width(), source.height()),
            request.size.as_tuple(),
        );
        if exceeds_pixel_budget((width, height)) {
            return Err(ProcessError::TooLarge {
                path: request.source.clone(),
                width,
                height,
            });
        }
    }

    let choice = naming::resize_extension(
        request.mode,
        source.color().has_alpha(),
        request.pad_color,
        &request.extension,
    );
    if choice.overridden {
        info!(
            "Extension overridden to {} for transparent {} mode (requested {})",
            choice.extension, request.mode, request.extension
        );
    }

    let resized = transform::apply(
        &source,
        request.mode,
        request.size,
        request.filter,
        request.pad_color,
    );

    let output_path = naming::resized_output_path(
        &request.source,
        (resized.width(), resized.height()),
        request.mode,
        &choice.extension,
    );
    Ok(ResultImage::new(resized, output_path))
}

/// Cut the subject of the request's source out of its background.
pub fn remove_background(
    backend: &dyn ImageBackend,
    segmenter: &dyn Segmenter,
    request: &BackgroundRemovalRequest,
) -> Result<ResultImage> {
    let path = &request.source;
    let bytes = backend.read(path).map_err(|source| ProcessError::Read {
        path: path.clone(),
        source,
    })?;
    let source = backend
        .open_bytes(&bytes)
        .map_err(|source| ProcessError::Open {
            path: path.clone(),
            source,
        })?;
    info!(
        "Imported image: {}, {}x{}, {:?}",
        path.display(),
        source.width(),
        source.height(),
        source.color()
    );
    debug!("Device hint: '{}'", request.device);

    let options = RemovalOptions {
        edge: request.edge,
        matting: request.matting,
        background_color: request.background_color,
    };
    let cutout = segmentation::remove(segmenter, &source, &options).map_err(|source| {
        ProcessError::Segmentation {
            path: path.clone(),
            source,
        }
    })?;

    let choice = naming::background_removal_extension(path);
    if choice.overridden {
        info!("Extension overridden to {} to keep transparency", choice.extension);
    }
    let output_path = naming::background_removed_output_path(path, request.edge, &choice.extension);
    Ok(ResultImage::new(DynamicImage::ImageRgba8(cutout), output_path))
}

/// Write a result image to its output path and return that path.
pub fn save_image(backend: &dyn ImageBackend, result: ResultImage) -> Result<PathBuf> {
    if result.output_path.as_os_str().is_empty() {
        return Err(ProcessError::MissingOutputPath);
    }
    match backend.save(&result.image, &result.output_path) {
        Ok(()) => {
            info!("File saved to: {}", result.output_path.display());
            Ok(result.output_path)
        }
        Err(source) => {
            error!(
                "File NOT saved to: {}, reason {}",
                result.output_path.display(),
                source
            );
            Err(ProcessError::Save {
                path: result.output_path,
                source,
            })
        }
    }
}

/// Resize and save. Returns the written path.
pub fn process_resize(backend: &dyn ImageBackend, request: &ResizeRequest) -> Result<PathBuf> {
    let result = resize_image(backend, request)?;
    save_image(backend, result)
}

/// Remove the background and save. Returns the written path.
pub fn process_background_removal(
    backend: &dyn ImageBackend,
    segmenter: &dyn Segmenter,
    request: &BackgroundRemovalRequest,
) -> Result<PathBuf> {
    let result = remove_background(backend, segmenter, request)?;
    save_image(backend, result)
}
