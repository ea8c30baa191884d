//! The interactive read-eval-print loop.
//!
//! [`Shell`] reads commands line by line, turns them into requests and runs
//! them through the [`imaging`](crate::imaging) operations. Input and output
//! are generic so a session can be driven from a `Cursor` in tests.
//!
//! A failed command never ends the session: parse errors and processing
//! errors are printed and the prompt comes back. Only `quit`, `exit` or end
//! of input stop the loop.

use crate::commands::{self, Command, EdgeArg, ResizeArgs};
use crate::config::KiyankaConfig;
use crate::imaging::{
    self, BackgroundRemovalRequest, ImageBackend, PadColor, ResizeMode, ResizeRequest,
};
use crate::output;
use crate::segmentation::Segmenter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a, R, W> {
    input: R,
    output: W,
    backend: &'a dyn ImageBackend,
    segmenter: &'a dyn Segmenter,
    config: &'a KiyankaConfig,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        backend: &'a dyn ImageBackend,
        segmenter: &'a dyn Segmenter,
        config: &'a KiyankaConfig,
    ) -> Self {
        Self {
            input,
            output,
            backend,
            segmenter,
            config,
        }
    }

    /// Print the intro and process commands until quit or end of input.
    ///
    /// Only I/O errors on the shell's own streams are returned.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", output::format_intro())?;
        loop {
            write!(self.output, "{}", output::PROMPT)?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(());
            };
            if let Flow::Quit = self.execute_line(&line)? {
                return Ok(());
            }
        }
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match commands::parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.output, "{}", output::format_error(&err))?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Help(topic) => {
                writeln!(self.output, "{}", output::format_help(topic.as_deref()))?
            }
            Command::ResizeUsage => write!(self.output, "{}", output::format_resize_usage())?,
            Command::Resize(args) => self.resize(args)?,
            Command::Rembg { path, edge } => self.rembg(path, edge)?,
        }
        Ok(Flow::Continue)
    }

    fn resize(&mut self, args: ResizeArgs) -> io::Result<()> {
        let pad_color = if args.mode == ResizeMode::Pad {
            self.prompt_pad_color()?
        } else {
            self.config.resize.pad_color
        };
        let request = ResizeRequest {
            source: args.path,
            size: args.size,
            mode: args.mode,
            extension: args.extension,
            filter: self.config.resize.filter,
            pad_color,
        };
        let result = imaging::process_resize(self.backend, &request);
        self.report(result)
    }

    /// Ask for the pad color; anything invalid falls back to the configured default.
    fn prompt_pad_color(&mut self) -> io::Result<PadColor> {
        let fallback = self.config.resize.pad_color;
        write!(self.output, "{}", output::PAD_COLOR_PROMPT)?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        match commands::parse_pad_color(&answer) {
            Ok(color) => Ok(color),
            Err(err) => {
                warn!("Invalid pad color input '{}': {}", answer.trim(), err);
                writeln!(
                    self.output,
                    "{}",
                    output::format_pad_color_fallback(&err, fallback)
                )?;
                Ok(fallback)
            }
        }
    }

    fn rembg(&mut self, path: PathBuf, edge: EdgeArg) -> io::Result<()> {
        let rembg = &self.config.rembg;
        if let EdgeArg::Unrecognized(token) = &edge {
            warn!("Unrecognized edge mode '{token}', using {}", rembg.edge.name());
            writeln!(
                self.output,
                "{}",
                output::format_edge_fallback(token, rembg.edge)
            )?;
        }
        let request = BackgroundRemovalRequest {
            source: path,
            device: rembg.device.clone(),
            edge: edge.resolve(rembg.edge),
            matting: rembg.matting,
            background_color: rembg.background_color,
        };
        let result = imaging::process_background_removal(self.backend, self.segmenter, &request);
        self.report(result)
    }

    fn report(&mut self, result: imaging::operations::Result<PathBuf>) -> io::Result<()> {
        match result {
            Ok(path) => writeln!(self.output, "{}", output::format_saved(&path)),
            Err(err) => writeln!(self.output, "{}", output::format_error(&err)),
        }
    }
}
