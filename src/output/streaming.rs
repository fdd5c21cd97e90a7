//! Streaming output writer
//!
//! Writes rendered lines to stdout as they are produced, colouring directory
//! entries when enabled.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::tree::TreeLine;

/// Line terminator for displayed output. Hash input always uses `\n`.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Writes lines straight to stdout without buffering the whole tree.
pub struct StreamingFormatter {
    stdout: StandardStream,
}

impl StreamingFormatter {
    /// `use_color` is the caller's final decision; the environment is not
    /// consulted again.
    pub fn new(use_color: bool) -> Self {
        let choice = if use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    /// Write one tree line; the entry text of directories is bold blue.
    pub fn write_tree_line(&mut self, line: &TreeLine) -> io::Result<()> {
        write!(self.stdout, "{}", line.prefix)?;
        if line.kind.is_some_and(|k| k.is_dir()) {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            write!(self.stdout, "{}", line.text)?;
            self.stdout.reset()?;
        } else {
            write!(self.stdout, "{}", line.text)?;
        }
        write!(self.stdout, "{}", LINE_ENDING)
    }

    /// Write an uncoloured line.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        write!(self.stdout, "{}{}", text, LINE_ENDING)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
