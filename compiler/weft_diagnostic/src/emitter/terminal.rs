//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::{self, Write};

use crate::Diagnostic;

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when writing to a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        Self::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: error: message
        self.write_colored("error", colors::ERROR);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        let excerpt = &diagnostic.excerpt;
        let pad = " ".repeat(excerpt.line.to_string().len());

        self.write_colored(&format!("{pad}-->"), colors::GUTTER);
        let _ = writeln!(
            self.writer,
            " line {}, column {}",
            excerpt.line, excerpt.column
        );
        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        let _ = writeln!(self.writer);
        self.write_colored(&format!("{} |", excerpt.line), colors::GUTTER);
        let _ = writeln!(self.writer, " {}", excerpt.line_text);
        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        let _ = write!(self.writer, " ");
        self.write_colored(&excerpt.caret(), colors::ERROR);
        let _ = writeln!(self.writer);

        if let Some(context) = &diagnostic.context {
            self.write_colored(&format!("{pad} = note"), colors::NOTE);
            let _ = writeln!(self.writer, ": while scanning {context} context");
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
