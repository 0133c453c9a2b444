//! Transition rules over the context stack.
//!
//! | Byte        | Active context      | Effect                                   |
//! |-------------|---------------------|------------------------------------------|
//! | `{`         | any                 | enter Inline                             |
//! | `}`         | Inline              | leave                                    |
//! | `<`         | Root                | enter Tag, InactiveTag, or nothing       |
//! | `>`         | Inline              | reported as a pipe                       |
//! | `>`         | Tag, InactiveTag, Array | leave, and leave Tag under an Array  |
//! | quote       | not Quoted          | enter Quoted with that quote             |
//! | quote       | Quoted, same quote  | leave                                    |
//! | quote       | Quoted, other quote | swallowed                                |
//! | `\`         | Quoted              | swallowed with the following byte        |
//! | `(`         | Inline, Array       | enter Array                              |
//! | `)`         | Array               | leave                                    |
//! | whitespace  | Tag                 | enter Array                              |
//!
//! Every symbol that is not swallowed becomes a [`Token`] whose captured
//! text runs from the end of the previous token up to the symbol.

use tracing::trace;
use weft_ir::NamespaceTable;
use weft_lexer_core::{ByteSet, Context, ContextKind, RawSymbol, Source, Splitter};

use crate::{LexError, LexErrorKind, Symbol, Token};

const CDATA_OPEN: &[u8] = b"<![CDATA[";
const CDATA_CLOSE: &[u8] = b"]]>";

/// Limits applied while sequencing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Maximum number of simultaneously open regions.
    pub max_depth: usize,
    /// How many bytes after `<` are examined for a namespace prefix.
    pub lookahead_limit: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            lookahead_limit: 64,
        }
    }
}

/// What a `<` opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagStart {
    /// `<prefix:` or `</prefix:` with a declared prefix.
    Active,
    /// Any other markup: `<div`, `</p`, `<!--`, `<?xml`.
    Inactive,
    /// A bare `<` in text, e.g. `a < b`.
    Text,
}

pub struct Sequencer<'src, 'ns> {
    splitter: Splitter<'src>,
    namespaces: &'ns NamespaceTable,
    config: SequencerConfig,
    ended: bool,
}

impl<'src, 'ns> Sequencer<'src, 'ns> {
    pub fn new(text: &'src str, namespaces: &'ns NamespaceTable, config: SequencerConfig) -> Self {
        Self {
            splitter: Splitter::new(Source::new(text)),
            namespaces,
            config,
            ended: false,
        }
    }

    /// Kind of the context active right now, after the last transition.
    pub fn context(&self) -> ContextKind {
        self.splitter.context().kind()
    }

    /// Number of open regions.
    pub fn depth(&self) -> usize {
        self.splitter.position().depth()
    }

    pub fn source(&self) -> &Source<'src> {
        self.splitter.source()
    }

    pub fn config(&self) -> SequencerConfig {
        self.config
    }

    /// Produce the next token.
    ///
    /// After [`Symbol::End`] has been returned, further calls keep
    /// returning it with an empty capture.
    pub fn next_token(&mut self) -> Result<Token<'src>, LexError> {
        loop {
            if self.ended {
                return Ok(self.end_token());
            }
            let Some(raw) = self.splitter.next_symbol() else {
                self.ended = true;
                continue;
            };
            let (byte, offset) = match raw {
                RawSymbol::End { offset } => return self.finish(offset),
                RawSymbol::Byte { byte, offset } => (byte, offset),
            };
            if let Some(token) = self.transition(byte, offset)? {
                return Ok(token);
            }
        }
    }

    fn transition(&mut self, byte: u8, offset: u32) -> Result<Option<Token<'src>>, LexError> {
        let active = self.splitter.context();
        let kind = active.kind();

        let token = match byte {
            b'{' => {
                let token = self.emit(Symbol::InlineOpen, offset, kind);
                self.enter(Context::INLINE, offset)?;
                token
            }
            b'}' => {
                let token = self.emit(Symbol::InlineClose, offset, kind);
                self.leave();
                token
            }
            b'<' => {
                if let Some(end) = self.cdata_end(offset) {
                    trace!(offset, end, "skipping CDATA section");
                    self.splitter.skip_to(end);
                    return Ok(None);
                }
                let token = self.emit(Symbol::TagOpen, offset, kind);
                match self.classify_tag(offset) {
                    TagStart::Active => self.enter(Context::TAG, offset)?,
                    TagStart::Inactive => self.enter(Context::INACTIVE_TAG, offset)?,
                    TagStart::Text => {}
                }
                token
            }
            b'>' if kind == ContextKind::Inline => self.emit(Symbol::Pipe, offset, kind),
            b'>' => {
                let token = self.emit(Symbol::TagEnd, offset, kind);
                self.leave();
                if self.splitter.context().kind() == ContextKind::Tag {
                    self.leave();
                }
                token
            }
            b'\'' | b'"' => match active.starting_byte() {
                None => {
                    let token = self.emit(Symbol::Quote(byte), offset, kind);
                    self.enter(Context::quoted(byte), offset)?;
                    token
                }
                Some(quote) if quote == byte => {
                    let token = self.emit(Symbol::Quote(byte), offset, kind);
                    self.leave();
                    token
                }
                Some(_) => return Ok(None),
            },
            b'\\' if kind == ContextKind::Quoted => {
                self.splitter.skip_bytes(1);
                return Ok(None);
            }
            b'(' => {
                let token = self.emit(Symbol::ParenOpen, offset, kind);
                self.enter(Context::ARRAY, offset)?;
                token
            }
            b')' => {
                let token = self.emit(Symbol::ParenClose, offset, kind);
                if kind != ContextKind::Inline {
                    self.leave();
                }
                token
            }
            b' ' | b'\t' | b'\r' | b'\n' => {
                let token = self.emit(Symbol::Whitespace, offset, kind);
                self.splitter.skip_run(ByteSet::WHITESPACE);
                self.splitter.position_mut().discard_pending();
                if kind == ContextKind::Tag {
                    self.enter(Context::ARRAY, offset)?;
                }
                token
            }
            b',' => self.emit(Symbol::Comma, offset, kind),
            b':' => self.emit(Symbol::Colon, offset, kind),
            b'=' => self.emit(Symbol::Equals, offset, kind),
            b'|' => self.emit(Symbol::Pipe, offset, kind),
            other => {
                return Err(LexError::new(
                    LexErrorKind::UnknownSymbol {
                        symbol: char::from(other),
                    },
                    offset,
                    kind,
                ))
            }
        };
        Ok(Some(token))
    }

    fn emit(&mut self, symbol: Symbol, offset: u32, context: ContextKind) -> Token<'src> {
        let span = self.splitter.position_mut().capture(offset);
        let captured = self.splitter.source().slice(span.start, span.end);
        trace!(?symbol, offset, context = context.name(), captured, "token");
        Token {
            symbol,
            offset,
            captured,
            context,
        }
    }

    fn enter(&mut self, context: Context, offset: u32) -> Result<(), LexError> {
        let depth = self.splitter.position().depth();
        if depth >= self.config.max_depth {
            return Err(LexError::new(
                LexErrorKind::NestingTooDeep {
                    limit: self.config.max_depth,
                },
                offset,
                self.context(),
            ));
        }
        trace!(
            from = self.context().name(),
            to = context.kind().name(),
            depth = depth + 1,
            "enter"
        );
        self.splitter.position_mut().enter(context, offset);
        Ok(())
    }

    fn leave(&mut self) {
        if let Some(left) = self.splitter.position_mut().leave() {
            trace!(
                left = left.kind().name(),
                to = self.context().name(),
                "leave"
            );
        }
    }

    fn finish(&mut self, offset: u32) -> Result<Token<'src>, LexError> {
        if let Some(frame) = self.splitter.position().outermost_unclosed() {
            return Err(LexError::new(
                LexErrorKind::Unterminated {
                    region: frame.context.kind(),
                },
                frame.opened_at,
                self.context(),
            ));
        }
        self.ended = true;
        Ok(self.emit(Symbol::End, offset, ContextKind::Root))
    }

    fn end_token(&self) -> Token<'src> {
        Token {
            symbol: Symbol::End,
            offset: self.source().len(),
            captured: "",
            context: ContextKind::Root,
        }
    }

    /// Offset just past a CDATA section starting at `offset`, or the end
    /// of input when it never closes.
    fn cdata_end(&self, offset: u32) -> Option<u32> {
        let bytes = self.source().as_bytes();
        let rest = bytes.get(offset as usize..)?;
        if !rest.starts_with(CDATA_OPEN) {
            return None;
        }
        let body = &rest[CDATA_OPEN.len()..];
        let end = match memchr::memmem::find(body, CDATA_CLOSE) {
            Some(i) => offset as usize + CDATA_OPEN.len() + i + CDATA_CLOSE.len(),
            None => bytes.len(),
        };
        Some(end as u32)
    }

    /// Look past `<` for `prefix:` with a declared prefix.
    fn classify_tag(&self, offset: u32) -> TagStart {
        let source = self.source();
        let bytes = source.as_bytes();
        let mut cursor = offset as usize + 1;
        let first = bytes.get(cursor).copied().unwrap_or(0);
        if first == b'/' {
            cursor += 1;
        }

        let name_start = cursor;
        let limit = name_start
            .saturating_add(self.config.lookahead_limit)
            .min(bytes.len());
        while cursor < limit && is_prefix_byte(bytes[cursor]) {
            cursor += 1;
        }
        if cursor > name_start && bytes.get(cursor) == Some(&b':') {
            let prefix = source.slice(name_start as u32, cursor as u32);
            if self.namespaces.contains(prefix) {
                return TagStart::Active;
            }
        }

        match first {
            b'/' | b'!' | b'?' => TagStart::Inactive,
            b if b.is_ascii_alphabetic() => TagStart::Inactive,
            _ => TagStart::Text,
        }
    }
}

#[inline]
fn is_prefix_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}
