use tracing::trace;
use weft_ir::{ArrayKey, ArrayNode, Node, Value};
use weft_lexer::Symbol;

use super::{literal, TreeBuilder};
use crate::error::{ParseError, ParseErrorKind};
use crate::stack::ensure_sufficient_stack;

/// Which byte closes the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ArrayMode {
    /// `(...)`: call arguments and parenthesised arrays.
    Arguments,
    /// `<ns:name ...>`: tag attributes, closed by `>` or `/>`.
    Attributes,
}

/// One entry under construction.
#[derive(Default)]
struct Entry<'src> {
    key: Option<ArrayKey>,
    value: Option<Value>,
    /// Unquoted word with no key yet; may still become one.
    bare: Option<&'src str>,
}

impl Entry<'_> {
    fn is_empty(&self) -> bool {
        self.key.is_none() && self.value.is_none() && self.bare.is_none()
    }
}

impl<'src> TreeBuilder<'src, '_> {
    /// Sequence a key/value list. `offset` is the opening byte.
    ///
    /// Returns the entries and, in attribute mode, whether the tag ended
    /// with `/>`.
    pub(super) fn sequence_array(
        &mut self,
        mode: ArrayMode,
        offset: u32,
    ) -> Result<(ArrayNode, bool), ParseError> {
        ensure_sufficient_stack(|| self.sequence_array_inner(mode, offset))
    }

    fn sequence_array_inner(
        &mut self,
        mode: ArrayMode,
        offset: u32,
    ) -> Result<(ArrayNode, bool), ParseError> {
        trace!(?mode, offset, "array");
        let mut array = ArrayNode::new();
        let mut entry = Entry::default();
        loop {
            let token = self.next()?;
            let word = token.trimmed();
            match token.symbol {
                Symbol::Whitespace => {
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    if entry.key.is_some() && entry.value.is_some() {
                        self.flush_entry(&mut entry, &mut array, token.offset)?;
                    }
                }
                Symbol::Comma => {
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    self.flush_entry(&mut entry, &mut array, token.offset)?;
                }
                Symbol::Colon | Symbol::Equals => {
                    self.take_key(&mut entry, &mut array, word, token.offset)?;
                }
                Symbol::Quote(quote) => {
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    let value = self.sequence_quoted(quote, token.offset)?;
                    self.place_value(&mut entry, &mut array, value, token.offset)?;
                }
                Symbol::InlineOpen => {
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    let node = self.sequence_inline(token.offset)?;
                    self.place_value(&mut entry, &mut array, Value::Node(node), token.offset)?;
                }
                Symbol::ParenOpen => {
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    let (nested, _) = self.sequence_array(ArrayMode::Arguments, token.offset)?;
                    let value = Value::Node(Node::Array(nested));
                    self.place_value(&mut entry, &mut array, value, token.offset)?;
                }
                Symbol::ParenClose if mode == ArrayMode::Arguments => {
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    self.flush_entry(&mut entry, &mut array, token.offset)?;
                    return Ok((array, false));
                }
                Symbol::TagEnd if mode == ArrayMode::Attributes => {
                    let (word, self_closing) = match word.strip_suffix('/') {
                        Some(rest) => (rest.trim_end(), true),
                        None => (word, false),
                    };
                    self.take_word(&mut entry, &mut array, word, token.offset, mode)?;
                    self.flush_entry(&mut entry, &mut array, token.offset)?;
                    return Ok((array, self_closing));
                }
                other => {
                    let detail = format!("unexpected {other} in {}", mode.describe());
                    return Err(self.malformed(detail, token.offset));
                }
            }
        }
    }

    /// An unquoted word: the value of a pending key, or a bare entry.
    ///
    /// Unquoted words must be numbers or object paths. `offset` is the
    /// symbol that ended the word.
    fn take_word(
        &mut self,
        entry: &mut Entry<'src>,
        array: &mut ArrayNode,
        word: &'src str,
        offset: u32,
        mode: ArrayMode,
    ) -> Result<(), ParseError> {
        if word.is_empty() {
            return Ok(());
        }
        let start = offset.saturating_sub(word.len() as u32);
        if word == "/" && mode == ArrayMode::Attributes {
            let detail = "'/' must come right before '>'".to_owned();
            return Err(self.malformed_tag(detail, start));
        }
        if literal::numeric(word).is_none() && !literal::is_object_path(word) {
            let detail = format!("\"{word}\" is neither a number nor an object path");
            return Err(self.malformed(detail, start));
        }
        if entry.key.is_some() {
            if entry.value.is_some() {
                return Err(self.malformed(format!("unexpected \"{word}\" after value"), offset));
            }
            entry.value = Some(self.bare_value(word));
            return Ok(());
        }
        if !entry.is_empty() {
            self.flush_entry(entry, array, offset)?;
        }
        entry.bare = Some(word);
        Ok(())
    }

    /// `:` or `=`: the word before it, or the pending bare word or quoted
    /// string, becomes the key.
    fn take_key(
        &mut self,
        entry: &mut Entry<'src>,
        array: &mut ArrayNode,
        word: &'src str,
        offset: u32,
    ) -> Result<(), ParseError> {
        if entry.key.is_some() {
            if entry.value.is_none() {
                let key = entry.key.as_ref().map(ToString::to_string).unwrap_or_default();
                return Err(self.malformed(format!("key \"{key}\" has no value"), offset));
            }
            self.flush_entry(entry, array, offset)?;
        }
        let key = if word.is_empty() {
            match (entry.bare.take(), entry.value.take()) {
                (Some(bare), None) => ArrayKey::parse(bare),
                (None, Some(Value::String(quoted))) => ArrayKey::parse(&quoted),
                _ => return Err(self.malformed("separator without a key".to_owned(), offset)),
            }
        } else {
            if !entry.is_empty() {
                self.flush_entry(entry, array, offset)?;
            }
            ArrayKey::parse(word)
        };
        entry.key = Some(key);
        Ok(())
    }

    /// A quoted, nested or inline value.
    fn place_value(
        &mut self,
        entry: &mut Entry<'src>,
        array: &mut ArrayNode,
        value: Value,
        offset: u32,
    ) -> Result<(), ParseError> {
        if entry.key.is_some() {
            if entry.value.is_some() {
                return Err(self.malformed("two values for one key".to_owned(), offset));
            }
        } else if !entry.is_empty() {
            self.flush_entry(entry, array, offset)?;
        }
        entry.value = Some(value);
        Ok(())
    }

    fn flush_entry(
        &mut self,
        entry: &mut Entry<'src>,
        array: &mut ArrayNode,
        offset: u32,
    ) -> Result<(), ParseError> {
        let Entry { key, value, bare } = std::mem::take(entry);
        let (key, value) = match (key, value, bare) {
            (None, None, None) => return Ok(()),
            (Some(key), Some(value), None) => (Some(key), value),
            (Some(key), None, None) => {
                return Err(self.malformed(format!("key \"{key}\" has no value"), offset));
            }
            (None, Some(value), None) => (None, value),
            (None, None, Some(word)) => match literal::numeric(word) {
                Some(number) => (None, number),
                None => (Some(ArrayKey::parse(word)), Value::Node(self.accessor_node(word))),
            },
            _ => return Err(self.malformed("unexpected value".to_owned(), offset)),
        };
        match key {
            Some(key) => {
                if array.contains_key(&key) {
                    return Err(self.malformed(format!("duplicate key \"{key}\""), offset));
                }
                array.insert(key, value);
            }
            None => array.push(value),
        }
        Ok(())
    }

    #[cold]
    fn malformed(&self, detail: String, offset: u32) -> ParseError {
        self.error(ParseErrorKind::malformed_arguments(detail), offset)
    }
}

impl ArrayMode {
    fn describe(self) -> &'static str {
        match self {
            ArrayMode::Arguments => "argument list",
            ArrayMode::Attributes => "tag attributes",
        }
    }
}
