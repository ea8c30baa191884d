//! Text shown to the user by the interactive shell.
//!
//! Every user-visible message is built by a pure `format_*` function so the
//! exact wording can be tested without a terminal. The shell only decides
//! *when* to print; this module decides *what*.
//!
//! # Output Format
//!
//! ```text
//! Welcome to Kiyanka.
//! A small tool to resize images and remove backgrounds.
//! Type "help" to see available commands.
//! >> resize photos/img.png 768,768 4 .jpg
//! Pad color R,G,B,A: 0,0,0,255
//! Saved: photos/img_768x768_pad.png
//! >> rembg photos/img.png fuzzy
//! Unknown edge mode 'fuzzy', using hard
//! Saved: photos/img_no_bg.png
//! ```
//!
//! Diagnostics (imported image details, extension overrides) go through
//! `tracing` to stderr; this module covers stdout only.

use crate::commands::{COMMAND_NAMES, CommandError};
use crate::imaging::{EdgeMode, PadColor, ResizeMode};
use std::fmt::Write;
use std::path::Path;

pub const PROMPT: &str = ">> ";
pub const PAD_COLOR_PROMPT: &str = "Pad color R,G,B,A: ";

pub fn format_intro() -> String {
    "Welcome to Kiyanka.\n\
     A small tool to resize images and remove backgrounds.\n\
     Type \"help\" to see available commands."
        .to_string()
}

/// Usage block for `resize`, including the mode id table.
pub fn format_resize_usage() -> String {
    let mut out = String::new();
    let rule = "-".repeat(45);
    let _ = writeln!(out, "Example:");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, ">> resize C:/img.png 768,768 2 .webp");
    let _ = writeln!(out, "{rule}");
    let _ = write!(out, "{}", format_mode_table());
    out
}

fn format_mode_table() -> String {
    let mut out = String::new();
    for (i, mode) in ResizeMode::ALL.iter().enumerate() {
        let label = if i == 0 { "resize modes:" } else { "" };
        let _ = writeln!(out, "{label:>28} {} {}", mode.id(), mode.name());
    }
    out
}

/// `help` with no topic lists commands; with a topic prints that command's help.
pub fn format_help(topic: Option<&str>) -> String {
    match topic {
        None => {
            let mut out = String::from("Available commands:\n");
            for name in COMMAND_NAMES {
                let _ = writeln!(out, "  {name:<8} {}", command_summary(name));
            }
            out.push_str("Type \"help <command>\" for details.");
            out
        }
        Some("resize") => format!(
            "Resize image: resize <path> <width>,<height> <mode> <extension>\n\
             Mode is an id (0-4) or a name. Pad mode asks for a color.\n\
             Extensions: .png .jpg .jpeg .bmp .tif .tiff .webp\n\n{}",
            format_resize_usage().trim_end()
        ),
        Some("rembg") => "Remove background: rembg <path> [soft|hard]\n\
             hard  binary mask, crisp outline\n\
             soft  alpha matting, graded edges\n\
             The result is written next to the source as <name>_no_bg.png\n\
             (or <name>_no_bg_soft.png)."
            .to_string(),
        Some("help") => "Show help: help [command]".to_string(),
        Some("quit") | Some("exit") => "Exit Kiyanka: quit (or exit)".to_string(),
        Some(other) => format!("No help for '{other}'."),
    }
}

fn command_summary(name: &str) -> &'static str {
    match name {
        "resize" => "Resize an image with one of five modes",
        "rembg" => "Remove the background of an image",
        "help" => "Show help",
        "quit" => "Exit",
        _ => "",
    }
}

pub fn format_saved(path: &Path) -> String {
    format!("Saved: {}", path.display())
}

pub fn format_error(err: &dyn std::error::Error) -> String {
    format!("Error: {err}")
}

pub fn format_pad_color_fallback(err: &CommandError, fallback: PadColor) -> String {
    format!("{err}, using pad color {fallback}")
}

pub fn format_edge_fallback(token: &str, fallback: EdgeMode) -> String {
    format!("Unknown edge mode '{token}', using {}", fallback.name())
}
