//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the command layer (which builds them from user input)
//! and the [`operations`](super::operations) module (which hands the pixel
//! work to the [`backend`](super::backend) and the segmenter).
//!
//! ## Types
//!
//! - [`ResizeMode`]: Closed set of resize strategies, with the numeric ids used on the command line.
//! - [`ResampleFilter`]: Resampling kernel, default bicubic.
//! - [`PadColor`]: RGBA fill for pad mode.
//! - [`TargetSize`]: Width × height box, both at least 1px.
//! - [`OutputExtension`]: Normalized extension with an encoder compiled in.
//! - [`ResizeRequest`]: Everything needed for a resize.
//! - [`EdgeMode`] / [`AlphaMatting`]: Edge handling for background removal.
//! - [`BackgroundRemovalRequest`]: Everything needed for a background removal.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resize strategy. The declaration order is the command-line id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Shrink to fit inside the box, never upscale.
    Thumbnail,
    /// Scale to fit entirely inside the box.
    Contain,
    /// Scale to fill the box, crop the excess from the top-left.
    Cover,
    /// Scale to fill the box, crop the excess around the center.
    Fit,
    /// Scale to fit inside the box, fill the rest with a color.
    Pad,
}

impl ResizeMode {
    pub const ALL: [ResizeMode; 5] = [
        ResizeMode::Thumbnail,
        ResizeMode::Contain,
        ResizeMode::Cover,
        ResizeMode::Fit,
        ResizeMode::Pad,
    ];

    /// Look up a mode by its command-line id (0–4).
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ResizeMode::Thumbnail => "thumbnail",
            ResizeMode::Contain => "contain",
            ResizeMode::Cover => "cover",
            ResizeMode::Fit => "fit",
            ResizeMode::Pad => "pad",
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResizeMode {
    type Err = String;

    /// Accepts either the numeric id or the mode name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u8>() {
            return Self::from_id(id).ok_or_else(|| format!("mode id must be 0-4, got {id}"));
        }
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resize mode '{s}'"))
    }
}

/// Resampling kernel used when scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    Gaussian,
    Lanczos,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

/// RGBA color, each component 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct PadColor(pub [u8; 4]);

impl PadColor {
    pub const TRANSPARENT_BLACK: PadColor = PadColor([0, 0, 0, 0]);
    pub const OPAQUE_BLACK: PadColor = PadColor([0, 0, 0, 255]);

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    pub fn is_opaque(self) -> bool {
        self.alpha() == u8::MAX
    }
}

impl Default for PadColor {
    fn default() -> Self {
        Self::TRANSPARENT_BLACK
    }
}

impl From<[u8; 4]> for PadColor {
    fn from(c: [u8; 4]) -> Self {
        Self(c)
    }
}

impl From<PadColor> for [u8; 4] {
    fn from(c: PadColor) -> Self {
        c.0
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "{r},{g},{b},{a}")
    }
}

impl FromStr for PadColor {
    type Err = String;

    /// Parse `R,G,B,A` (or `R,G,B`, taken as opaque). Every component must be 0–255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(format!(
                "expected 3 or 4 comma-separated components, got {}",
                parts.len()
            ));
        }
        let mut rgba = [0, 0, 0, u8::MAX];
        for (slot, part) in rgba.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|_| format!("'{part}' is not a value in 0-255"))?;
        }
        Ok(Self(rgba))
    }
}

/// Target box for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// Longest side accepted for a target box.
    pub const MAX_SIDE: u32 = 16_384;
    /// Largest pixel count accepted for any image a resize allocates.
    pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

    /// Returns `None` when either side is zero, a side exceeds
    /// [`MAX_SIDE`](Self::MAX_SIDE) or the area exceeds [`MAX_PIXELS`](Self::MAX_PIXELS).
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let in_range = |side: u32| (1..=Self::MAX_SIDE).contains(&side);
        (in_range(width) && in_range(height) && !exceeds_pixel_budget((width, height)))
            .then_some(Self { width, height })
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FromStr for TargetSize {
    type Err = String;

    /// Parse `W,H` (an `x` separator is accepted too).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(',')
            .or_else(|| s.split_once(['x', 'X']))
            .ok_or_else(|| format!("expected <width>,<height>, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a positive integer", v.trim()))
        };
        let (w, h) = (parse(w)?, parse(h)?);
        Self::new(w, h).ok_or_else(|| {
            format!(
                "size must be between 1x1 and {max}x{max} and at most {} pixels, got {w}x{h}",
                Self::MAX_PIXELS,
                max = Self::MAX_SIDE
            )
        })
    }
}

/// True when an image of `dims` would be over [`TargetSize::MAX_PIXELS`].
pub fn exceeds_pixel_budget(dims: (u32, u32)) -> bool {
    u64::from(dims.0) * u64::from(dims.1) > TargetSize::MAX_PIXELS
}

/// Extensions with an encoder compiled in.
const WRITABLE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Extensions treated as unable to carry transparency.
const NO_ALPHA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Output file extension: lowercase, with a leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputExtension(String);

impl OutputExtension {
    pub fn png() -> Self {
        Self(".png".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension without the leading dot.
    pub fn bare(&self) -> &str {
        &self.0[1..]
    }

    pub fn supports_alpha(&self) -> bool {
        !NO_ALPHA_EXTENSIONS.contains(&self.bare())
    }
}

impl fmt::Display for OutputExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OutputExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.trim().trim_start_matches('.').to_ascii_lowercase();
        if WRITABLE_EXTENSIONS.contains(&bare.as_str()) {
            Ok(Self(format!(".{bare}")))
        } else {
            Err(format!(
                "unsupported extension '{s}' (supported: {})",
                WRITABLE_EXTENSIONS.join(", ")
            ))
        }
    }
}

/// Everything needed for a resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub source: PathBuf,
    pub size: TargetSize,
    pub mode: ResizeMode,
    pub extension: OutputExtension,
    pub filter: ResampleFilter,
    /// Only read in pad mode.
    pub pad_color: PadColor,
}

/// Edge handling for background removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Binary mask.
    #[default]
    Hard,
    /// Alpha matting for graded edges.
    Soft,
}

impl EdgeMode {
    pub fn name(self) -> &'static str {
        match self {
            EdgeMode::Hard => "hard",
            EdgeMode::Soft => "soft",
        }
    }
}

impl FromStr for EdgeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(EdgeMode::Hard),
            "soft" => Ok(EdgeMode::Soft),
            other => Err(format!("unknown edge mode '{other}'")),
        }
    }
}

/// Alpha-matting knobs, only read for [`EdgeMode::Soft`].
///
/// - `foreground_threshold`: mask values above this are definite foreground
/// - `background_threshold`: mask values below this are definite background
/// - `erode_size`: erosion radius applied to both definite regions
/// - `base_size`: long-edge cap for the matting pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlphaMatting {
    pub foreground_threshold: u8,
    pub background_threshold: u8,
    pub erode_size: u8,
    pub base_size: u32,
}

impl Default for AlphaMatting {
    fn default() -> Self {
        Self {
            foreground_threshold: 240,
            background_threshold: 10,
            erode_size: 10,
            base_size: 1000,
        }
    }
}

/// Everything needed for a background removal.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundRemovalRequest {
    pub source: PathBuf,
    /// Compute device hint. Recorded in logs, otherwise unused.
    pub device: String,
    pub edge: EdgeMode,
    pub matting: AlphaMatting,
    /// Solid replacement background; `None` keeps transparency.
    pub background_color: Option<PadColor>,
}
