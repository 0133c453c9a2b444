//! Diagnostic rendering for Weft template errors.
//!
//! Errors carry a byte offset. This crate turns that offset into a line,
//! a column, and an excerpt of the offending line with a caret under the
//! exact byte, then writes it to a terminal with optional color.

pub mod emitter;
mod excerpt;
pub mod span_utils;

pub use emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
pub use excerpt::SourceExcerpt;
pub use span_utils::LineOffsetTable;

/// A renderable error: message, the context it arose in, and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Lexical context active at the failure, e.g. `inline`.
    pub context: Option<String>,
    pub excerpt: SourceExcerpt,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, excerpt: SourceExcerpt) -> Self {
        Self {
            message: message.into(),
            context: None,
            excerpt,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
