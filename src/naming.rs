//! Output file naming and the extension-override policy.
//!
//! Every output is written beside its source, named from the source stem:
//!
//! - resize: `img.png` → `img_768x768_pad.png`
//!   (`<stem>_<W>x<H>_<mode><ext>`, W×H being the *result* size)
//! - background removal: `photo.jpg` → `photo_no_bg.png` (hard edge) or
//!   `photo_no_bg_soft.png` (soft edge)
//!
//! ## Extension Overrides
//!
//! Transparency must survive the write. Pad mode switches to `.png` when the
//! requested extension cannot hold alpha, or when the pad color is
//! translucent and the source has no alpha channel of its own. Background
//! removal always produces alpha, so anything but a `.png` source becomes
//! `.png`.

use crate::imaging::{EdgeMode, OutputExtension, PadColor, ResizeMode};
use std::path::{Path, PathBuf};

/// The extension an operation will actually write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionChoice {
    pub extension: OutputExtension,
    /// True when the requested extension was replaced.
    pub overridden: bool,
}

impl ExtensionChoice {
    fn kept(extension: OutputExtension) -> Self {
        Self {
            extension,
            overridden: false,
        }
    }

    fn forced_png() -> Self {
        Self {
            extension: OutputExtension::png(),
            overridden: true,
        }
    }
}

/// Decide the output extension for a resize.
///
/// Only pad mode can override: it introduces pixels of the pad color, so the
/// result needs alpha whenever the color is translucent, and the policy
/// treats every pad result as alpha-carrying when the target format cannot
/// store it.
pub fn resize_extension(
    mode: ResizeMode,
    source_has_alpha: bool,
    pad_color: PadColor,
    requested: &OutputExtension,
) -> ExtensionChoice {
    if mode != ResizeMode::Pad {
        return ExtensionChoice::kept(requested.clone());
    }
    let translucent_pad_on_opaque = !source_has_alpha && !pad_color.is_opaque();
    if translucent_pad_on_opaque || !requested.supports_alpha() {
        ExtensionChoice::forced_png()
    } else {
        ExtensionChoice::kept(requested.clone())
    }
}

/// Decide the output extension for a background removal from the source path.
///
/// The source extension is kept only if it is writable and alpha-capable.
pub fn background_removal_extension(source: &Path) -> ExtensionChoice {
    source
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse::<OutputExtension>().ok())
        .filter(OutputExtension::supports_alpha)
        .map(ExtensionChoice::kept)
        .unwrap_or_else(ExtensionChoice::forced_png)
}

fn source_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<dir>/<stem>_<W>x<H>_<mode><ext>`
pub fn resized_output_path(
    source: &Path,
    dims: (u32, u32),
    mode: ResizeMode,
    extension: &OutputExtension,
) -> PathBuf {
    let name = format!(
        "{}_{}x{}_{}{}",
        source_stem(source),
        dims.0,
        dims.1,
        mode.name(),
        extension
    );
    source.with_file_name(name)
}

/// `<dir>/<stem>_no_bg<ext>` or `<dir>/<stem>_no_bg_soft<ext>`
pub fn background_removed_output_path(
    source: &Path,
    edge: EdgeMode,
    extension: &OutputExtension,
) -> PathBuf {
    let suffix = match edge {
        EdgeMode::Hard => "_no_bg",
        EdgeMode::Soft => "_no_bg_soft",
    };
    source.with_file_name(format!("{}{}{}", source_stem(source), suffix, extension))
}
