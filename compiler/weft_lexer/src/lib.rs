//! Sequencer for Weft templates.
//!
//! Wraps a [`Splitter`](weft_lexer_core::Splitter) and applies the
//! transition rules: which symbol enters or leaves which context, which
//! `<` opens a template tag, which quote closes a string. The output is a
//! stream of [`Token`]s, each carrying the text captured since the
//! previous token.

mod lex_error;
mod sequencer;
mod token;

pub use lex_error::{LexError, LexErrorKind};
pub use sequencer::{Sequencer, SequencerConfig};
pub use token::{Symbol, Token};

pub use weft_lexer_core::{ByteSet, ContextKind};
