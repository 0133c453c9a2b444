//! Tokens produced by the sequencer.

use std::fmt;

use weft_lexer_core::{ByteSet, ContextKind};

/// Classified interesting byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `{`
    InlineOpen,
    /// `}`
    InlineClose,
    /// `<`
    TagOpen,
    /// `>` outside inline context.
    TagEnd,
    /// `'` or `"`; the byte is kept.
    Quote(u8),
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// A run of spaces, tabs and newlines.
    Whitespace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `=`
    Equals,
    /// `|`, or `>` inside inline context.
    Pipe,
    /// End of input.
    End,
}

impl Symbol {
    pub fn describe(self) -> &'static str {
        match self {
            Symbol::InlineOpen => "'{'",
            Symbol::InlineClose => "'}'",
            Symbol::TagOpen => "'<'",
            Symbol::TagEnd => "'>'",
            Symbol::Quote(b'\'') => "single quote",
            Symbol::Quote(_) => "double quote",
            Symbol::ParenOpen => "'('",
            Symbol::ParenClose => "')'",
            Symbol::Whitespace => "whitespace",
            Symbol::Comma => "','",
            Symbol::Colon => "':'",
            Symbol::Equals => "'='",
            Symbol::Pipe => "pipe",
            Symbol::End => "end of input",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A symbol with the text captured since the previous token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    pub symbol: Symbol,
    /// 0-based byte offset of the symbol.
    pub offset: u32,
    /// Text between the previous token and this symbol.
    pub captured: &'src str,
    /// Context active when the symbol was recognized.
    pub context: ContextKind,
}

impl<'src> Token<'src> {
    /// Captured text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &'src str {
        ByteSet::WHITESPACE.trim(self.captured)
    }

    /// Captured text with surrounding `ignore` bytes removed.
    pub fn trimmed_by(&self, ignore: ByteSet) -> &'src str {
        ignore.trim(self.captured)
    }

    pub fn is_end(&self) -> bool {
        self.symbol == Symbol::End
    }
}
