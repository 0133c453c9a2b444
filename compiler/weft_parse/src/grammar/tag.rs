use tracing::debug;
use weft_ir::{ArrayNode, Node};
use weft_lexer::{LexErrorKind, Symbol};

use super::array::ArrayMode;
use super::{OpenTag, TreeBuilder};
use crate::error::{ParseError, ParseErrorKind};
use crate::interceptor::InterceptionPoint;

impl<'src> TreeBuilder<'src, '_> {
    /// Sequence a template tag. `offset` is the `<`.
    ///
    /// Opening tags are pushed onto the open-tag stack, closing tags pop
    /// it, and self-closing tags are attached right away.
    pub(super) fn sequence_tag(
        &mut self,
        offset: u32,
        children: &mut Vec<Node>,
    ) -> Result<(), ParseError> {
        let colon = self.next()?;
        if colon.symbol != Symbol::Colon {
            let detail = format!("unexpected {} in tag name", colon.symbol);
            return Err(self.malformed_tag(detail, colon.offset));
        }
        let raw_prefix = colon.trimmed();
        let closing = raw_prefix.starts_with('/');
        let prefix = raw_prefix.trim_start_matches('/');

        let token = self.next()?;
        let (identifier, arguments, self_closing) = match token.symbol {
            Symbol::TagEnd => match token.trimmed().strip_suffix('/') {
                Some(identifier) => (identifier.trim_end(), ArrayNode::new(), true),
                None => (token.trimmed(), ArrayNode::new(), false),
            },
            Symbol::Whitespace => {
                let identifier = token.trimmed();
                let (arguments, self_closing) =
                    self.sequence_array(ArrayMode::Attributes, token.offset)?;
                (identifier, arguments, self_closing)
            }
            Symbol::Colon => {
                let detail = format!(
                    "tag name {raw_prefix}:{} has more than one ':'",
                    token.trimmed()
                );
                return Err(self.malformed_tag(detail, token.offset));
            }
            other => {
                let detail = format!("unexpected {other} in tag name");
                return Err(self.malformed_tag(detail, token.offset));
            }
        };
        if identifier.is_empty() {
            return Err(self.malformed_tag(format!("missing name after {prefix}:"), offset));
        }

        let name = format!("{prefix}:{identifier}");
        if closing {
            if !arguments.is_empty() || self_closing {
                let detail = format!("closing tag </{name}> cannot carry attributes");
                return Err(self.malformed_tag(detail, offset));
            }
            return self.close_tag(name, offset, children);
        }

        let limit = self.session.config.max_depth;
        if self.open.len() >= limit {
            let kind = ParseErrorKind::Lex(LexErrorKind::NestingTooDeep { limit });
            return Err(self.error(kind, offset));
        }
        let node = self.open_call(prefix, identifier, arguments, offset)?;
        if self_closing {
            debug!(tag = %name, offset, "self-closing tag");
            let node = self.intercept(node, InterceptionPoint::CallClosed);
            self.attach(children, node);
        } else {
            debug!(tag = %name, offset, depth = self.open.len() + 1, "tag opened");
            self.open.push(OpenTag { name, offset, node });
            self.state.set_depth(self.open.len());
        }
        Ok(())
    }

    fn close_tag(
        &mut self,
        name: String,
        offset: u32,
        children: &mut Vec<Node>,
    ) -> Result<(), ParseError> {
        let Some(open) = self.open.pop() else {
            return Err(self.error(ParseErrorKind::UnexpectedClosingTag { found: name }, offset));
        };
        if open.name != name {
            let kind = ParseErrorKind::MismatchedClosingTag {
                expected: open.name,
                found: name,
            };
            return Err(self.error(kind, offset));
        }
        debug!(tag = %name, offset, "tag closed");
        self.state.set_depth(self.open.len());
        let node = self.intercept(open.node, InterceptionPoint::CallClosed);
        self.attach(children, node);
        Ok(())
    }

    #[cold]
    pub(super) fn malformed_tag(&self, detail: String, offset: u32) -> ParseError {
        self.error(ParseErrorKind::MalformedTag { detail }, offset)
    }
}
