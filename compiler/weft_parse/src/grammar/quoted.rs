use tracing::trace;
use weft_ir::{Node, Value};
use weft_lexer::Symbol;

use super::literal::unescape_into;
use super::TreeBuilder;
use crate::error::{ParseError, ParseErrorKind};
use crate::stack::ensure_sufficient_stack;

impl TreeBuilder<'_, '_> {
    /// Sequence a quoted string opened by `quote` at `offset`.
    ///
    /// Plain content is returned as [`Value::String`]. Content that is a
    /// single inline expression is returned as that node; mixed content
    /// becomes a [`Node::Root`] of text and expression nodes.
    pub(super) fn sequence_quoted(&mut self, quote: u8, offset: u32) -> Result<Value, ParseError> {
        ensure_sufficient_stack(|| self.sequence_quoted_inner(quote, offset))
    }

    fn sequence_quoted_inner(&mut self, quote: u8, offset: u32) -> Result<Value, ParseError> {
        trace!(quote = %char::from(quote), offset, "quoted");
        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            let token = self.next()?;
            unescape_into(&mut text, token.captured);
            match token.symbol {
                Symbol::Quote(closing) if closing == quote => break,
                Symbol::InlineOpen => {
                    if !text.is_empty() {
                        let node = self.text_node(std::mem::take(&mut text));
                        parts.push(node);
                    }
                    let node = self.sequence_inline(token.offset)?;
                    parts.push(node);
                }
                other => {
                    let detail = format!("unexpected {other} in quoted string");
                    let kind = ParseErrorKind::malformed_arguments(detail);
                    return Err(self.error(kind, token.offset));
                }
            }
        }

        if parts.is_empty() {
            return Ok(Value::String(text));
        }
        if !text.is_empty() {
            let node = self.text_node(text);
            parts.push(node);
        }
        let node = if parts.len() == 1 {
            parts.swap_remove(0)
        } else {
            Node::Root(parts)
        };
        Ok(Value::Node(node))
    }
}
