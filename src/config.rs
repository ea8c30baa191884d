//! Tool configuration.
//!
//! Settings come from an optional `kiyanka.toml`. A missing file means stock
//! defaults; a present file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! filter = "bicubic"        # nearest | bilinear | bicubic | gaussian | lanczos
//! pad_color = [0, 0, 0, 0]  # Used when the pad color prompt gets bad input
//!
//! [rembg]
//! model = "models/u2net.onnx"
//! device = "cpu"            # Hint only, recorded in the log
//! edge = "hard"             # Edge mode when `rembg` gets no token: hard | soft
//! # background_color = [255, 255, 255, 255]   # Omit to keep transparency
//!
//! [rembg.matting]
//! foreground_threshold = 240
//! background_threshold = 10
//! erode_size = 10
//! base_size = 1000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{AlphaMatting, EdgeMode, PadColor, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `kiyanka.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KiyankaConfig {
    pub resize: ResizeConfig,
    pub rembg: RembgConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub filter: ResampleFilter,
    /// Fallback for the interactive pad color prompt.
    pub pad_color: PadColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RembgConfig {
    /// Path to the ONNX segmentation model.
    pub model: PathBuf,
    pub device: String,
    /// Edge mode used when the command gives none (or an unknown one).
    pub edge: EdgeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<PadColor>,
    pub matting: AlphaMatting,
}

impl Default for RembgConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/u2net.onnx"),
            device: "cpu".to_string(),
            edge: EdgeMode::Hard,
            background_color: None,
            matting: AlphaMatting::default(),
        }
    }
}

impl KiyankaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let matting = &self.rembg.matting;
        if matting.background_threshold >= matting.foreground_threshold {
            return Err(ConfigError::Validation(format!(
                "rembg.matting.background_threshold ({}) must be below foreground_threshold ({})",
                matting.background_threshold, matting.foreground_threshold
            )));
        }
        if matting.base_size == 0 {
            return Err(ConfigError::Validation(
                "rembg.matting.base_size must be non-zero".into(),
            ));
        }
        if self.rembg.model.as_os_str().is_empty() {
            return Err(ConfigError::Validation("rembg.model must not be empty".into()));
        }
        Ok(())
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<KiyankaConfig, ConfigError> {
    let config: KiyankaConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// Returns stock defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<KiyankaConfig, ConfigError> {
    if !path.exists() {
        return Ok(KiyankaConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `kiyanka.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Kiyanka Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# Resampling kernel: nearest | bilinear | bicubic | gaussian | lanczos
filter = "bicubic"

# Pad color used when the interactive prompt gets invalid input, as [R, G, B, A].
pad_color = [0, 0, 0, 0]

# ---------------------------------------------------------------------------
# Background removal
# ---------------------------------------------------------------------------
[rembg]
# U2-Net style segmentation model in ONNX format.
model = "models/u2net.onnx"

# Compute device hint. Inference always runs on the CPU; this is logged only.
device = "cpu"

# Edge mode used when `rembg` is given no edge token: hard | soft
edge = "hard"

# Solid color to place behind the subject, as [R, G, B, A].
# Leave unset to keep the background transparent.
# background_color = [255, 255, 255, 255]

# Alpha matting, used by the soft edge mode.
[rembg.matting]
# Mask values above this are definite foreground.
foreground_threshold = 240
# Mask values below this are definite background.
background_threshold = 10
# Erosion radius applied to both definite regions, widening the soft band.
erode_size = 10
# Long-edge cap for the matting pass.
base_size = 1000
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = KiyankaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resize.filter, ResampleFilter::Bicubic);
        assert_eq!(config.resize.pad_color, PadColor::TRANSPARENT_BLACK);
        assert_eq!(config.rembg.model, PathBuf::from("models/u2net.onnx"));
        assert_eq!(config.rembg.edge, EdgeMode::Hard);
        assert_eq!(config.rembg.background_color, None);
        assert_eq!(config.rembg.matting, AlphaMatting::default());
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), KiyankaConfig::default());
    }

    #[test]
    fn stock_toml_matches_defaults() {
        assert_eq!(
            parse_config(stock_config_toml()).unwrap(),
            KiyankaConfig::default()
        );
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config(
            r#"
[rembg]
edge = "soft"
background_color = [255, 255, 255, 255]

[rembg.matting]
erode_size = 4
"#,
        )
        .unwrap();

        assert_eq!(config.rembg.edge, EdgeMode::Soft);
        assert_eq!(
            config.rembg.background_color,
            Some(PadColor([255, 255, 255, 255]))
        );
        assert_eq!(config.rembg.matting.erode_size, 4);
        assert_eq!(config.rembg.matting.foreground_threshold, 240);
        assert_eq!(config.rembg.model, PathBuf::from("models/u2net.onnx"));
        assert_eq!(config.resize, ResizeConfig::default());
    }

    #[test]
    fn resize_section_parses() {
        let config = parse_config(
            r#"
[resize]
filter = "lanczos"
pad_color = [10, 20, 30, 255]
"#,
        )
        .unwrap();
        assert_eq!(config.resize.filter, ResampleFilter::Lanczos);
        assert_eq!(config.resize.pad_color, PadColor([10, 20, 30, 255]));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = parse_config(
            r#"
[resize]
quality = 90
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_filter_rejected() {
        let result = parse_config("[resize]\nfilter = \"sinc\"\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn out_of_range_color_rejected() {
        let result = parse_config("[resize]\npad_color = [0, 0, 0, 300]\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let result = parse_config(
            r#"
[rembg.matting]
foreground_threshold = 10
background_threshold = 240
"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_base_size_rejected() {
        let result = parse_config("[rembg.matting]\nbase_size = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("kiyanka.toml")).unwrap();
        assert_eq!(config, KiyankaConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kiyanka.toml");
        fs::write(&path, "[rembg]\nmodel = \"/opt/models/u2netp.onnx\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.rembg.model, PathBuf::from("/opt/models/u2netp.onnx"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kiyanka.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Io(_))));
    }
}
