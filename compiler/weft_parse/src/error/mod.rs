//! Parse errors.
//!
//! Every failure is fatal and produces exactly one [`ParseError`]. The
//! error records the byte offset, the lexical context active at the time,
//! and a [`SourceExcerpt`] so it can be displayed without the source.

use thiserror::Error;
use weft_diagnostic::{Diagnostic, SourceExcerpt};
use weft_lexer::{ContextKind, LexError, LexErrorKind};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexErrorKind),

    #[error("unterminated tag <{name}>")]
    UnterminatedTag { name: String },

    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag { expected: String, found: String },

    #[error("closing tag </{found}> has no matching opening tag")]
    UnexpectedClosingTag { found: String },

    #[error("malformed tag: {detail}")]
    MalformedTag { detail: String },

    #[error("undeclared namespace \"{namespace}\"")]
    UnknownNamespace { namespace: String },

    #[error("unknown callable \"{namespace}:{identifier}\"")]
    UnknownIdentifier {
        namespace: String,
        identifier: String,
    },

    #[error("argument \"{argument}\" is not declared by {call}")]
    UndeclaredArgument { call: String, argument: String },

    #[error("{call} requires argument \"{argument}\"")]
    MissingRequiredArgument { call: String, argument: String },

    #[error("malformed argument list: {detail}")]
    MalformedArguments { detail: String },

    #[error("malformed inline expression: {detail}")]
    MalformedInline { detail: String },
}

impl ParseErrorKind {
    pub(crate) fn malformed_arguments(detail: impl Into<String>) -> Self {
        ParseErrorKind::MalformedArguments {
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed_inline(detail: impl Into<String>) -> Self {
        ParseErrorKind::MalformedInline {
            detail: detail.into(),
        }
    }
}

/// A located parse failure.
///
/// `Display` renders the message followed by the source excerpt:
///
/// ```text
/// mismatched closing tag: expected </a:foo>, found </a:bar>
///  --> line 1, column 12
///   |
/// 1 | <a:foo>text</a:bar>
///   |            ^
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}\n{excerpt}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 0-based byte offset.
    pub offset: u32,
    /// Lexical context active when the error was raised.
    pub context: ContextKind,
    pub excerpt: SourceExcerpt,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, offset: u32, context: ContextKind, source: &str) -> Self {
        ParseError {
            kind,
            offset,
            context,
            excerpt: SourceExcerpt::locate(source, offset),
        }
    }

    #[cold]
    pub fn from_lex(error: LexError, source: &str) -> Self {
        Self::new(
            ParseErrorKind::Lex(error.kind),
            error.offset,
            error.context,
            source,
        )
    }

    /// 1-based line.
    pub fn line(&self) -> u32 {
        self.excerpt.line
    }

    /// 1-based column, in characters.
    pub fn column(&self) -> u32 {
        self.excerpt.column
    }

    /// Convert for rendering with a [`weft_diagnostic::DiagnosticEmitter`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.kind.to_string(), self.excerpt.clone())
            .with_context(self.context.name())
    }
}
