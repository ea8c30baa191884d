//! # Kiyanka
//!
//! A small interactive tool that resizes images and removes their
//! backgrounds. Commands are typed at a `>> ` prompt; every result is written
//! next to its source with a name that says what was done to it.
//!
//! ```text
//! >> resize photos/img.png 768,768 4 .jpg
//! Pad color R,G,B,A: 0,0,0,255
//! Saved: photos/img_768x768_pad.png
//! >> rembg photos/cat.jpg soft
//! Saved: photos/cat_no_bg_soft.png
//! ```
//!
//! # Architecture
//!
//! ```text
//! stdin ─► shell ─► commands::parse_command ─► imaging::process_* ─► ImageBackend::save
//!                                                     │
//!                                      transform / segmentation + naming
//! ```
//!
//! The pixel work sits behind two capability traits, so everything above
//! them is testable with in-memory fakes:
//!
//! - [`imaging::ImageBackend`]: decode and encode files ([`imaging::RustBackend`]
//!   in production, built on the `image` crate).
//! - [`segmentation::Segmenter`]: predict a foreground mask
//!   ([`segmentation::OnnxSegmenter`] in production, running a U²-Net style
//!   model through `tract-onnx`).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`shell`] | The read-eval-print loop |
//! | [`commands`] | Parses a command line into a typed [`commands::Command`] |
//! | [`imaging`] | Resize modes, request types, backends, dispatch and save |
//! | [`segmentation`] | Mask prediction, hard/soft edge refinement, compositing |
//! | [`naming`] | Output filenames and the extension-override policy |
//! | [`output`] | Every user-visible message, as pure `format_*` functions |
//! | [`config`] | Optional `kiyanka.toml` loading and validation |
//!
//! # Design Decisions
//!
//! ## Transparency Wins Over the Requested Extension
//!
//! Pad mode can introduce transparent pixels that the source never had. If
//! the requested format cannot store them, the output is written as PNG
//! instead and the override is logged. Background removal always writes PNG,
//! with or without a configured background color.
//!
//! ## Model Loaded on First Use
//!
//! Loading and optimizing the ONNX graph takes far longer than a resize. A
//! session that only resizes never pays for it; a session that removes many
//! backgrounds pays once.

pub mod commands;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod segmentation;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_helpers;
