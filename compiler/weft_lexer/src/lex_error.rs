//! Sequencer errors.
//!
//! Every error carries the exact byte offset it points at and the context
//! that was active when it was raised.

use thiserror::Error;
use weft_lexer_core::ContextKind;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
#[error("{kind}")]
pub struct LexError {
    /// 0-based byte offset. For unterminated regions this is the opening
    /// symbol of the outermost unclosed region.
    pub offset: u32,
    pub kind: LexErrorKind,
    /// Context active when the error was raised.
    pub context: ContextKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum LexErrorKind {
    /// Input ended inside a region.
    #[error("unterminated {}", .region.region())]
    Unterminated { region: ContextKind },
    /// A byte the active context marks interesting but has no rule for.
    #[error("unexpected symbol {symbol:?}")]
    UnknownSymbol { symbol: char },
    #[error("regions nested deeper than {limit}")]
    NestingTooDeep { limit: usize },
}

impl LexError {
    pub fn new(kind: LexErrorKind, offset: u32, context: ContextKind) -> Self {
        Self {
            offset,
            kind,
            context,
        }
    }
}
