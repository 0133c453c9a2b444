use tracing::debug;
use weft_ir::Node;
use weft_lexer::{ContextKind, Symbol};

use super::TreeBuilder;
use crate::error::{ParseError, ParseErrorKind};

impl<'src> TreeBuilder<'src, '_> {
    /// Sequence the whole template into a [`Node::Root`].
    pub(crate) fn sequence_root(&mut self) -> Result<Node, ParseError> {
        let mut children = Vec::new();
        let mut text = String::new();
        loop {
            let token = self.next()?;
            text.push_str(token.captured);
            match token.symbol {
                Symbol::InlineOpen => {
                    self.flush_text(&mut text, &mut children);
                    let node = self.sequence_inline(token.offset)?;
                    self.attach(&mut children, node);
                }
                Symbol::TagOpen => match self.tokens.context() {
                    ContextKind::Tag => {
                        self.flush_text(&mut text, &mut children);
                        self.sequence_tag(token.offset, &mut children)?;
                    }
                    ContextKind::InactiveTag => {
                        text.push('<');
                        self.sequence_inactive_tag(&mut text, &mut children)?;
                    }
                    _ => text.push('<'),
                },
                Symbol::End => {
                    self.flush_text(&mut text, &mut children);
                    if let Some(open) = self.open.last() {
                        let kind = ParseErrorKind::UnterminatedTag {
                            name: open.name.clone(),
                        };
                        return Err(self.error(kind, open.offset));
                    }
                    debug!(children = children.len(), "root sequenced");
                    return Ok(Node::Root(children));
                }
                other => {
                    let kind = ParseErrorKind::MalformedTag {
                        detail: format!("unexpected {other} in text"),
                    };
                    return Err(self.error(kind, token.offset));
                }
            }
        }
    }

    /// Markup that is not a template tag. Its text is kept as written,
    /// but inline expressions inside it are still sequenced.
    fn sequence_inactive_tag(
        &mut self,
        text: &mut String,
        children: &mut Vec<Node>,
    ) -> Result<(), ParseError> {
        loop {
            let token = self.next()?;
            text.push_str(token.captured);
            match token.symbol {
                Symbol::InlineOpen => {
                    self.flush_text(text, children);
                    let node = self.sequence_inline(token.offset)?;
                    self.attach(children, node);
                }
                Symbol::TagEnd => {
                    text.push('>');
                    return Ok(());
                }
                other => {
                    let kind = ParseErrorKind::MalformedTag {
                        detail: format!("unexpected {other} in markup"),
                    };
                    return Err(self.error(kind, token.offset));
                }
            }
        }
    }
}
