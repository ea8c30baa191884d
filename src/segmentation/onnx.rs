//! ONNX segmenter for U²-Net style salient-object models, run with `tract-onnx`.
//!
//! The model takes a `1×3×320×320` ImageNet-normalized tensor and returns a
//! `1×1×320×320` saliency map. The map is min–max normalized to 0–255 and
//! scaled back to the source size with Lanczos3.
//!
//! Loading and optimizing the graph is the expensive part, so it happens on
//! the first prediction and the plan is reused for the rest of the session.

use super::{SegmentationError, Segmenter};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tract_onnx::prelude::*;

const INPUT_SIZE: u32 = 320;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

type Plan = TypedRunnableModel<TypedModel>;

pub struct OnnxSegmenter {
    model_path: PathBuf,
    plan: OnceCell<Plan>,
}

impl OnnxSegmenter {
    /// Does not touch the filesystem; the model is read on first use.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            plan: OnceCell::new(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn is_loaded(&self) -> bool {
        self.plan.get().is_some()
    }

    fn plan(&self) -> Result<&Plan, SegmentationError> {
        if let Some(plan) = self.plan.get() {
            return Ok(plan);
        }
        let plan = load_plan(&self.model_path)?;
        info!("Loaded segmentation model: {}", self.model_path.display());
        Ok(self.plan.get_or_init(|| plan))
    }
}

fn load_plan(path: &Path) -> Result<Plan, SegmentationError> {
    let model_load = |reason: String| SegmentationError::ModelLoad {
        path: path.to_path_buf(),
        reason,
    };
    if !path.is_file() {
        return Err(model_load("model file not found".to_string()));
    }
    debug!("Optimizing ONNX graph from {}", path.display());
    let size = INPUT_SIZE as usize;
    tract_onnx::onnx()
        .model_for_path(path)
        .and_then(|m| m.with_input_fact(0, f32::fact([1, 3, size, size]).into()))
        .and_then(|m| m.into_optimized())
        .and_then(|m| m.into_runnable())
        .map_err(|e| model_load(format!("{e:#}")))
}

/// Resize to the model input and normalize like the training pipeline:
/// divide by the brightest channel value, then per-channel mean/std.
fn to_input_tensor(image: &DynamicImage) -> Tensor {
    let rgb = image
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3)
        .to_rgb8();
    let max = rgb.as_raw().iter().copied().max().unwrap_or(0).max(1) as f32;
    let size = INPUT_SIZE as usize;
    tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        let v = rgb.get_pixel(x as u32, y as u32).0[c] as f32 / max;
        (v - MEAN[c]) / STD[c]
    })
    .into()
}

/// Min–max normalize raw model output into a mask.
fn to_mask(values: &[f32], side: u32) -> GrayImage {
    let (lo, hi) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = (hi - lo).max(f32::EPSILON);
    GrayImage::from_fn(side, side, |x, y| {
        let v = values[(y * side + x) as usize];
        Luma([(((v - lo) / range) * 255.0).round().clamp(0.0, 255.0) as u8])
    })
}

impl Segmenter for OnnxSegmenter {
    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage, SegmentationError> {
        let plan = self.plan()?;
        let outputs = plan
            .run(tvec!(to_input_tensor(image).into()))
            .map_err(|e| SegmentationError::Inference(format!("{e:#}")))?;
        let first = outputs
            .first()
            .ok_or_else(|| SegmentationError::InvalidOutput("model produced no output".into()))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| SegmentationError::InvalidOutput(format!("{e:#}")))?;

        let pixels = (INPUT_SIZE * INPUT_SIZE) as usize;
        if view.len() < pixels {
            return Err(SegmentationError::InvalidOutput(format!(
                "expected at least {pixels} values, got {:?}",
                view.shape()
            )));
        }
        // First channel of the first batch item (NCHW)
        let values: Vec<f32> = view.iter().take(pixels).copied().collect();
        let mask = to_mask(&values, INPUT_SIZE);
        Ok(imageops::resize(
            &mask,
            image.width(),
            image.height(),
            FilterType::Lanczos3,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_load() {
        let segmenter = OnnxSegmenter::new("/nonexistent/u2net.onnx");
        assert!(!segmenter.is_loaded());
        assert_eq!(segmenter.model_path(), Path::new("/nonexistent/u2net.onnx"));
    }

    #[test]
    fn missing_model_is_a_load_error() {
        let segmenter = OnnxSegmenter::new("/nonexistent/u2net.onnx");
        let result = segmenter.predict_mask(&DynamicImage::new_rgb8(8, 8));
        match result {
            Err(SegmentationError::ModelLoad { path, reason }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/u2net.onnx"));
                assert!(reason.contains("not found"));
            }
            other => panic!("expected ModelLoad, got {other:?}"),
        }
        assert!(!segmenter.is_loaded());
    }

    #[test]
    fn corrupt_model_is_a_load_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.onnx");
        std::fs::write(&path, b"not a protobuf").unwrap();

        let result = OnnxSegmenter::new(&path).predict_mask(&DynamicImage::new_rgb8(8, 8));
        assert!(matches!(result, Err(SegmentationError::ModelLoad { .. })));
    }

    #[test]
    fn input_tensor_shape() {
        let tensor = to_input_tensor(&DynamicImage::new_rgb8(50, 30));
        assert_eq!(tensor.shape(), &[1, 3, 320, 320]);
    }

    #[test]
    fn mask_is_min_max_normalized() {
        let values = vec![-2.0, 0.0, 2.0, 2.0];
        let mask = to_mask(&values, 2);
        assert_eq!(mask.into_raw(), vec![0, 128, 255, 255]);
    }

    #[test]
    fn flat_output_does_not_divide_by_zero() {
        let mask = to_mask(&[0.5; 4], 2);
        assert_eq!(mask.into_raw(), vec![0; 4]);
    }
}
