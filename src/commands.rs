//! Command-line parsing for the interactive shell.
//!
//! Every line typed at the `>> ` prompt goes through [`parse_command`], which
//! either produces a fully-typed [`Command`] or a [`CommandError`] saying what
//! was wrong. Nothing here touches the filesystem: a bad mode id or size is
//! rejected before any image is opened.
//!
//! ## Grammar
//!
//! ```text
//! resize <path> <width>,<height> <mode> <extension>   mode: 0-4 or a mode name
//! resize                                              prints usage
//! rembg <path> [soft|hard]
//! help [command]
//! quit | exit
//! ```

use crate::imaging::{EdgeMode, OutputExtension, PadColor, ResizeMode, TargetSize};
use std::path::PathBuf;
use thiserror::Error;

/// Command names understood by the shell, in help order.
pub const COMMAND_NAMES: &[&str] = &["resize", "rembg", "help", "quit"];

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type \"help\" to see available commands.")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Invalid size: {0}")]
    InvalidSize(String),
    #[error("Invalid resize mode: {0}")]
    InvalidMode(String),
    #[error("Invalid extension: {0}")]
    InvalidExtension(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Arguments of a complete `resize` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeArgs {
    pub path: PathBuf,
    pub size: TargetSize,
    pub mode: ResizeMode,
    pub extension: OutputExtension,
}

/// The optional edge token of `rembg`.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeArg {
    /// No token given.
    Default,
    Given(EdgeMode),
    /// A token that is neither `soft` nor `hard`.
    Unrecognized(String),
}

impl EdgeArg {
    fn parse(token: &str) -> Self {
        token
            .parse::<EdgeMode>()
            .map(EdgeArg::Given)
            .unwrap_or_else(|_| EdgeArg::Unrecognized(token.to_string()))
    }

    pub fn resolve(&self, default: EdgeMode) -> EdgeMode {
        match self {
            EdgeArg::Given(mode) => *mode,
            EdgeArg::Default | EdgeArg::Unrecognized(_) => default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize(ResizeArgs),
    /// `resize` with no arguments.
    ResizeUsage,
    Rembg { path: PathBuf, edge: EdgeArg },
    Help(Option<String>),
    Quit,
    /// Blank line.
    Empty,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return Ok(Command::Empty);
    };
    let args: Vec<&str> = tokens.collect();

    match name.to_ascii_lowercase().as_str() {
        "resize" => parse_resize(&args),
        "rembg" => parse_rembg(&args),
        "help" | "?" => {
            reject_extra(&args, 1)?;
            Ok(Command::Help(args.first().map(|s| s.to_ascii_lowercase())))
        }
        "quit" | "exit" => {
            reject_extra(&args, 0)?;
            Ok(Command::Quit)
        }
        _ => Err(CommandError::Unknown(name.to_string())),
    }
}

fn parse_resize(args: &[&str]) -> Result<Command, CommandError> {
    let Some(path) = args.first() else {
        return Ok(Command::ResizeUsage);
    };
    let size = args
        .get(1)
        .ok_or(CommandError::MissingArgument("size (<width>,<height>)"))?;
    let mode = args
        .get(2)
        .ok_or(CommandError::MissingArgument("resize mode (0-4)"))?;
    let extension = args
        .get(3)
        .ok_or(CommandError::MissingArgument("output extension"))?;
    reject_extra(args, 4)?;

    Ok(Command::Resize(ResizeArgs {
        path: PathBuf::from(path),
        size: size.parse().map_err(CommandError::InvalidSize)?,
        mode: mode.parse().map_err(CommandError::InvalidMode)?,
        extension: extension.parse().map_err(CommandError::InvalidExtension)?,
    }))
}

fn parse_rembg(args: &[&str]) -> Result<Command, CommandError> {
    let path = args
        .first()
        .ok_or(CommandError::MissingArgument("image path"))?;
    reject_extra(args, 2)?;
    let edge = args.get(1).map_or(EdgeArg::Default, |t| EdgeArg::parse(t));
    Ok(Command::Rembg {
        path: PathBuf::from(path),
        edge,
    })
}

fn reject_extra(args: &[&str], max: usize) -> Result<(), CommandError> {
    match args.get(max) {
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
        None => Ok(()),
    }
}

/// Parse the answer to the pad color prompt.
pub fn parse_pad_color(input: &str) -> Result<PadColor, CommandError> {
    input.trim().parse().map_err(CommandError::InvalidColor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize(line: &str) -> ResizeArgs {
        match parse_command(line).unwrap() {
            Command::Resize(args) => args,
            other => panic!("expected Resize, got {other:?}"),
        }
    }

    // =========================================================================
    // resize
    // =========================================================================

    #[test]
    fn resize_full_command() {
        let args = resize("resize C:/img.png 768,768 2 .webp");
        assert_eq!(args.path, PathBuf::from("C:/img.png"));
        assert_eq!(args.size, TargetSize::new(768, 768).unwrap());
        assert_eq!(args.mode, ResizeMode::Cover);
        assert_eq!(args.extension.as_str(), ".webp");
    }

    #[test]
    fn resize_every_mode_id() {
        for mode in ResizeMode::ALL {
            let args = resize(&format!("resize a.png 10,10 {} .png", mode.id()));
            assert_eq!(args.mode, mode);
        }
    }

    #[test]
    fn resize_mode_by_name() {
        assert_eq!(resize("resize a.png 10,10 pad .png").mode, ResizeMode::Pad);
    }

    #[test]
    fn resize_extension_without_dot() {
        assert_eq!(resize("resize a.png 10,10 0 JPG").extension.as_str(), ".jpg");
    }

    #[test]
    fn resize_without_arguments_is_usage() {
        assert_eq!(parse_command("resize").unwrap(), Command::ResizeUsage);
        assert_eq!(parse_command("  resize   ").unwrap(), Command::ResizeUsage);
    }

    #[test]
    fn resize_invalid_mode_id_rejected() {
        assert!(matches!(
            parse_command("resize a.png 10,10 7 .png"),
            Err(CommandError::InvalidMode(_))
        ));
        assert!(matches!(
            parse_command("resize a.png 10,10 stretch .png"),
            Err(CommandError::InvalidMode(_))
        ));
    }

    #[test]
    fn resize_invalid_size_rejected() {
        for size in ["768", "0,10", "a,b", "-5,5"] {
            assert!(
                matches!(
                    parse_command(&format!("resize a.png {size} 1 .png")),
                    Err(CommandError::InvalidSize(_))
                ),
                "size {size} should be rejected"
            );
        }
    }

    #[test]
    fn resize_oversized_box_rejected() {
        assert!(matches!(
            parse_command("resize a.png 4294967295,4294967295 1 .png"),
            Err(CommandError::InvalidSize(_))
        ));
    }

    #[test]
    fn resize_unsupported_extension_rejected() {
        assert!(matches!(
            parse_command("resize a.png 10,10 1 .gif"),
            Err(CommandError::InvalidExtension(_))
        ));
    }

    #[test]
    fn resize_missing_arguments() {
        assert_eq!(
            parse_command("resize a.png"),
            Err(CommandError::MissingArgument("size (<width>,<height>)"))
        );
        assert_eq!(
            parse_command("resize a.png 10,10"),
            Err(CommandError::MissingArgument("resize mode (0-4)"))
        );
        assert_eq!(
            parse_command("resize a.png 10,10 1"),
            Err(CommandError::MissingArgument("output extension"))
        );
    }

    #[test]
    fn resize_extra_argument_rejected() {
        assert_eq!(
            parse_command("resize a.png 10,10 1 .png now"),
            Err(CommandError::UnexpectedArgument("now".into()))
        );
    }

    // =========================================================================
    // rembg
    // =========================================================================

    #[test]
    fn rembg_default_edge() {
        assert_eq!(
            parse_command("rembg photo.jpg").unwrap(),
            Command::Rembg {
                path: PathBuf::from("photo.jpg"),
                edge: EdgeArg::Default,
            }
        );
    }

    #[test]
    fn rembg_explicit_edges() {
        for (token, mode) in [("soft", EdgeMode::Soft), ("HARD", EdgeMode::Hard)] {
            match parse_command(&format!("rembg photo.jpg {token}")).unwrap() {
                Command::Rembg { edge, .. } => assert_eq!(edge, EdgeArg::Given(mode)),
                other => panic!("expected Rembg, got {other:?}"),
            }
        }
    }

    #[test]
    fn rembg_unrecognized_edge_is_kept_for_notice() {
        match parse_command("rembg photo.jpg fuzzy").unwrap() {
            Command::Rembg { edge, .. } => {
                assert_eq!(edge, EdgeArg::Unrecognized("fuzzy".into()));
                assert_eq!(edge.resolve(EdgeMode::Soft), EdgeMode::Soft);
            }
            other => panic!("expected Rembg, got {other:?}"),
        }
    }

    #[test]
    fn edge_arg_resolve() {
        assert_eq!(EdgeArg::Default.resolve(EdgeMode::Hard), EdgeMode::Hard);
        assert_eq!(
            EdgeArg::Given(EdgeMode::Soft).resolve(EdgeMode::Hard),
            EdgeMode::Soft
        );
    }

    #[test]
    fn rembg_requires_path() {
        assert_eq!(
            parse_command("rembg"),
            Err(CommandError::MissingArgument("image path"))
        );
    }

    // =========================================================================
    // Other commands
    // =========================================================================

    #[test]
    fn quit_and_exit() {
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("EXIT").unwrap(), Command::Quit);
    }

    #[test]
    fn help_with_and_without_topic() {
        assert_eq!(parse_command("help").unwrap(), Command::Help(None));
        assert_eq!(
            parse_command("help Resize").unwrap(),
            Command::Help(Some("resize".into()))
        );
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(parse_command("").unwrap(), Command::Empty);
        assert_eq!(parse_command("   \t").unwrap(), Command::Empty);
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("shrink a.png"),
            Err(CommandError::Unknown("shrink".into()))
        );
    }

    // =========================================================================
    // Pad color prompt
    // =========================================================================

    #[test]
    fn pad_color_four_components() {
        assert_eq!(
            parse_pad_color("0,0,0,255\n").unwrap(),
            PadColor([0, 0, 0, 255])
        );
    }

    #[test]
    fn pad_color_three_components_is_opaque() {
        assert_eq!(
            parse_pad_color("255, 128, 0").unwrap(),
            PadColor([255, 128, 0, 255])
        );
    }

    #[test]
    fn pad_color_invalid_inputs() {
        for input in ["999,0,0,0", "1,2", "a,b,c,d", "", "1,2,3,4,5", "-1,0,0,0"] {
            assert!(
                matches!(parse_pad_color(input), Err(CommandError::InvalidColor(_))),
                "'{input}' should be rejected"
            );
        }
    }
}
