//! `{...}` inline expressions.
//!
//! An inline is one of:
//!
//! - an object accessor: `{user.name}`
//! - a call, optionally piped: `{value | f:format()}`, `{value -> f:format()}`
//! - an array literal: `{a: 1, b: 'two', c: {nested}}`
//! - anything a registered expression recognizer matches: `{a + b}`
//!
//! Words that fit none of these (`{a b c}`) are kept as text. Structural
//! problems found before the closing `}` are held back until it is reached,
//! because a recognizer may still claim the whole expression.

use tracing::trace;
use weft_ir::{ArrayKey, ArrayNode, Node, Value};
use weft_lexer::Symbol;

use super::array::ArrayMode;
use super::literal;
use super::TreeBuilder;
use crate::error::{ParseError, ParseErrorKind};
use crate::expression;
use crate::interceptor::InterceptionPoint;
use crate::stack::ensure_sufficient_stack;

#[derive(Default)]
struct Inline<'src> {
    /// Bare word not consumed yet.
    pending: Option<&'src str>,
    /// More words than any construct accounts for: `{a b}`.
    stray: bool,
    /// Word before the last `:`, the namespace if a call follows.
    namespace: Option<&'src str>,
    /// Key of the array entry under construction.
    key: Option<ArrayKey>,
    /// The next call is the value of `key`: `{k: f:x()}`.
    keyed_call: bool,
    /// Quoted string or nested inline.
    literal: Option<Value>,
    /// Left-hand side of a pipe, then the call wrapping it.
    subject: Option<Node>,
    array: ArrayNode,
    is_array: bool,
    call_detected: bool,
    awaiting_call: bool,
    failure: Option<ParseError>,
}

impl Inline<'_> {
    fn has_value(&self) -> bool {
        self.pending.is_some() || self.literal.is_some()
    }

    fn fail(&mut self, error: ParseError) {
        self.failure.get_or_insert(error);
    }
}

impl<'src> TreeBuilder<'src, '_> {
    /// Sequence an inline expression. `offset` is the `{`.
    pub(super) fn sequence_inline(&mut self, offset: u32) -> Result<Node, ParseError> {
        ensure_sufficient_stack(|| self.sequence_inline_inner(offset))
    }

    fn sequence_inline_inner(&mut self, offset: u32) -> Result<Node, ParseError> {
        trace!(offset, "inline");
        let mut inline = Inline::default();
        loop {
            let token = self.next()?;
            let word = token.trimmed();
            match token.symbol {
                Symbol::Whitespace => self.inline_word(&mut inline, word),
                Symbol::Colon => self.inline_colon(&mut inline, word, token.offset),
                Symbol::ParenOpen => self.inline_call(&mut inline, word, token.offset)?,
                Symbol::Pipe => {
                    // legacy `->`
                    let word = if self.tokens.source().byte_at(token.offset) == b'>' {
                        word.strip_suffix('-').unwrap_or(word).trim_end()
                    } else {
                        word
                    };
                    self.inline_pipe(&mut inline, word, token.offset);
                }
                Symbol::Comma => {
                    self.inline_word(&mut inline, word);
                    self.inline_entry(&mut inline, token.offset);
                }
                Symbol::Quote(quote) => {
                    self.inline_word(&mut inline, word);
                    let value = self.sequence_quoted(quote, token.offset)?;
                    self.inline_literal(&mut inline, value);
                }
                Symbol::InlineOpen => {
                    self.inline_word(&mut inline, word);
                    let node = self.sequence_inline(token.offset)?;
                    self.inline_literal(&mut inline, Value::Node(node));
                }
                Symbol::InlineClose => {
                    self.inline_word(&mut inline, word);
                    return self.finish_inline(inline, offset, token.offset);
                }
                other => {
                    let detail = format!("unexpected {other}");
                    return Err(self.malformed_inline(detail, token.offset));
                }
            }
        }
    }

    fn inline_word(&mut self, inline: &mut Inline<'src>, word: &'src str) {
        if word.is_empty() {
            return;
        }
        if inline.has_value() || inline.awaiting_call || inline.call_detected {
            inline.stray = true;
        }
        inline.pending = Some(word);
    }

    fn inline_literal(&mut self, inline: &mut Inline<'src>, value: Value) {
        if inline.has_value() || (inline.call_detected && !inline.awaiting_call) {
            inline.stray = true;
        }
        inline.literal = Some(value);
    }

    /// `:` after a key, or between a namespace and a call name.
    fn inline_colon(&mut self, inline: &mut Inline<'src>, word: &'src str, offset: u32) {
        if inline.key.is_some() {
            if inline.has_value() {
                self.inline_entry(inline, offset);
            } else if !word.is_empty() && !inline.keyed_call {
                inline.namespace = Some(word);
                inline.keyed_call = true;
                return;
            } else {
                let error = self.malformed_inline("':' after a key with no value", offset);
                inline.fail(error);
                return;
            }
        }

        if !word.is_empty() {
            if inline.has_value() {
                inline.stray = true;
            }
            inline.namespace = Some(word);
            inline.key = Some(ArrayKey::parse(word));
        } else if let Some(pending) = inline.pending.take() {
            inline.namespace = Some(pending);
            inline.key = Some(ArrayKey::parse(pending));
        } else {
            match inline.literal.take() {
                Some(Value::String(quoted)) => inline.key = Some(ArrayKey::parse(&quoted)),
                other => {
                    inline.literal = other;
                    let error = self.malformed_inline("':' without a key", offset);
                    inline.fail(error);
                }
            }
        }
    }

    /// `(`: a call to `namespace:word`.
    fn inline_call(
        &mut self,
        inline: &mut Inline<'src>,
        word: &'src str,
        offset: u32,
    ) -> Result<(), ParseError> {
        let (arguments, _) = self.sequence_array(ArrayMode::Arguments, offset)?;
        if word.is_empty() {
            // parenthesised array as a value: `{a: (1, 2)}`
            self.inline_literal(inline, Value::Node(Node::Array(arguments)));
            return Ok(());
        }
        let Some(namespace) = inline.namespace.take() else {
            let detail = format!("call to \"{word}\" has no namespace");
            let error = self.malformed_inline(detail, offset);
            inline.fail(error);
            return Ok(());
        };

        let mut node = self.open_call(namespace, word, arguments, offset)?;
        if inline.keyed_call {
            inline.keyed_call = false;
            let node = self.intercept(node, InterceptionPoint::CallClosed);
            self.inline_literal(inline, Value::Node(node));
            return Ok(());
        }

        inline.key = None;
        if inline.pending.is_some() || inline.literal.is_some() {
            inline.stray = true;
        }
        match inline.subject.take() {
            Some(subject) if inline.awaiting_call => node.append(subject),
            Some(_) => inline.stray = true,
            None => {}
        }
        inline.subject = Some(self.intercept(node, InterceptionPoint::CallClosed));
        inline.call_detected = true;
        inline.awaiting_call = false;
        Ok(())
    }

    /// `|` or `->`: what is pending becomes the left-hand side of a call.
    fn inline_pipe(&mut self, inline: &mut Inline<'src>, word: &'src str, offset: u32) {
        if inline.key.is_some() || inline.is_array {
            let error = self.malformed_inline("pipe inside an array literal", offset);
            inline.fail(error);
            return;
        }
        self.inline_word(inline, word);
        let subject = if let Some(word) = inline.pending.take() {
            Some(match literal::numeric(word) {
                Some(_) => self.text_node(word),
                None => self.accessor_node(word),
            })
        } else if let Some(value) = inline.literal.take() {
            Some(self.literal_node(value))
        } else {
            inline.subject.take()
        };
        match subject {
            Some(subject) => inline.subject = Some(subject),
            None => {
                let error = self.malformed_inline("pipe without a value on its left", offset);
                inline.fail(error);
            }
        }
        inline.awaiting_call = true;
    }

    /// Move the pending key and value into the array literal.
    fn inline_entry(&mut self, inline: &mut Inline<'src>, offset: u32) {
        inline.is_array = true;
        inline.namespace = None;
        inline.keyed_call = false;
        let key = inline.key.take();
        let entry = if let Some(word) = inline.pending.take() {
            match (key, literal::numeric(word)) {
                (Some(key), Some(number)) => Some((Some(key), number)),
                (Some(key), None) => Some((Some(key), Value::Node(self.accessor_node(word)))),
                (None, Some(number)) => Some((None, number)),
                (None, None) => Some((
                    Some(ArrayKey::parse(word)),
                    Value::Node(self.accessor_node(word)),
                )),
            }
        } else if let Some(value) = inline.literal.take() {
            Some((key, value))
        } else if let Some(node) = inline.subject.take() {
            Some((key, Value::Node(node)))
        } else if let Some(key) = key {
            let error = self.malformed_inline(format!("key \"{key}\" has no value"), offset);
            inline.fail(error);
            None
        } else {
            None
        };

        match entry {
            Some((Some(key), _)) if inline.array.contains_key(&key) => {
                let error = self.malformed_inline(format!("duplicate key \"{key}\""), offset);
                inline.fail(error);
            }
            Some((Some(key), value)) => {
                inline.array.insert(key, value);
            }
            Some((None, value)) => inline.array.push(value),
            None => {}
        }
    }

    fn finish_inline(
        &mut self,
        mut inline: Inline<'src>,
        open: u32,
        close: u32,
    ) -> Result<Node, ParseError> {
        let source = self.tokens.source();
        let raw = source.slice(open, close + 1);
        let inner = source.slice(open + 1, close).trim();

        if !inline.call_detected && !inner.is_empty() {
            if let Some(node) = expression::recognize(self.session.recognizers, inner) {
                trace!(expression = inner, "recognized");
                return Ok(node);
            }
        }

        if inline.call_detected && !inline.is_array && inline.key.is_none() {
            if let Some(error) = inline.failure {
                return Err(error);
            }
            if inline.stray || inline.has_value() {
                return Err(self.malformed_inline("unexpected value after call", close));
            }
            if inline.awaiting_call {
                return Err(self.malformed_inline("pipe must be followed by a call", close));
            }
            if let Some(call) = inline.subject {
                return Ok(call);
            }
        }

        if let Some(error) = inline.failure.take() {
            return Err(error);
        }
        if inline.awaiting_call {
            return Err(self.malformed_inline("pipe must be followed by a call", close));
        }
        if inline.stray {
            return Ok(self.text_node(raw));
        }
        if inline.is_array || inline.key.is_some() {
            self.inline_entry(&mut inline, close);
            if let Some(error) = inline.failure {
                return Err(error);
            }
            return Ok(Node::Array(inline.array));
        }
        if let Some(value) = inline.literal.take() {
            return Ok(self.literal_node(value));
        }
        match inline.pending {
            Some(word) if literal::numeric(word).is_some() => Ok(self.text_node(word)),
            Some(word) => Ok(self.accessor_node(word)),
            None => Ok(self.text_node(raw)),
        }
    }

    fn literal_node(&mut self, value: Value) -> Node {
        match value {
            Value::String(text) => self.text_node(text),
            Value::Integer(number) => self.text_node(number.to_string()),
            Value::Float(number) => self.text_node(number.to_string()),
            Value::Node(node) => node,
        }
    }

    #[cold]
    fn malformed_inline(&self, detail: impl Into<String>, offset: u32) -> ParseError {
        self.error(ParseErrorKind::malformed_inline(detail), offset)
    }
}
