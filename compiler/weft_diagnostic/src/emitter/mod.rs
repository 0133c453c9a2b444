//! Diagnostic output.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Sink for rendered diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn flush(&mut self) {}

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests;
