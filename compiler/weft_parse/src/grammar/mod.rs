//! Tree builder.
//!
//! Mutually recursive sub-routines pulling tokens from one [`Sequencer`]:
//!
//! - `root`: text, inline expressions, inactive markup and the open-tag stack
//! - `tag`: `<ns:name ...>`, `</ns:name>` and `<ns:name .../>`
//! - `inline`: `{...}` accessors, calls, pipes and array literals
//! - `array`: call arguments, parenthesised arrays and tag attributes
//! - `quoted`: string literals with embedded inline expressions
//!
//! Every sub-routine consumes exactly the tokens of its construct, so the
//! caller resumes right after it.

mod array;
mod inline;
mod literal;
mod quoted;
mod root;
mod tag;

use std::sync::Arc;

use tracing::{debug, trace};
use weft_ir::{ArrayKey, ArrayNode, CallNode, CallableDescriptor, Capabilities, Node, Value};
use weft_lexer::{Sequencer, Token};

use crate::error::{ParseError, ParseErrorKind};
use crate::interceptor::{self, InterceptionPoint};
use crate::resolver::Resolution;
use crate::{ParseSession, ParsingState};

/// A tag whose closing tag has not been seen yet.
struct OpenTag {
    /// `prefix:identifier` as written.
    name: String,
    offset: u32,
    node: Node,
}

pub(crate) struct TreeBuilder<'src, 'p> {
    tokens: Sequencer<'src, 'p>,
    session: &'p ParseSession<'p>,
    state: ParsingState<'p>,
    open: Vec<OpenTag>,
}

impl<'src, 'p> TreeBuilder<'src, 'p> {
    pub(crate) fn new(source: &'src str, session: &'p ParseSession<'p>) -> Self {
        TreeBuilder {
            tokens: Sequencer::new(source, session.namespaces, session.config.sequencer()),
            session,
            state: ParsingState::new(session.namespaces),
            open: Vec::new(),
        }
    }

    pub(crate) fn into_state(self) -> ParsingState<'p> {
        self.state
    }

    fn next(&mut self) -> Result<Token<'src>, ParseError> {
        self.tokens
            .next_token()
            .map_err(|error| ParseError::from_lex(error, self.tokens.source().text()))
    }

    fn source_text(&self) -> &'src str {
        self.tokens.source().text()
    }

    #[cold]
    fn error(&self, kind: ParseErrorKind, offset: u32) -> ParseError {
        ParseError::new(kind, offset, self.tokens.context(), self.source_text())
    }

    fn intercept(&mut self, node: Node, point: InterceptionPoint) -> Node {
        let interceptors = self.session.interceptors;
        interceptor::intercept(interceptors, node, point, &mut self.state)
    }

    fn text_node(&mut self, text: impl Into<String>) -> Node {
        self.intercept(Node::Text(text.into()), InterceptionPoint::TextProduced)
    }

    fn accessor_node(&mut self, path: &str) -> Node {
        self.intercept(
            Node::ObjectAccessor(path.to_owned()),
            InterceptionPoint::AccessorProduced,
        )
    }

    /// Flush pending text into `children` (or the innermost open tag).
    fn flush_text(&mut self, text: &mut String, children: &mut Vec<Node>) {
        if text.is_empty() {
            return;
        }
        let node = self.text_node(std::mem::take(text));
        self.attach(children, node);
    }

    fn attach(&mut self, children: &mut Vec<Node>, node: Node) {
        match self.open.last_mut() {
            Some(open) => open.node.append(node),
            None => children.push(node),
        }
    }

    /// Look `prefix:identifier` up through every namespace bound to `prefix`.
    fn resolve(
        &self,
        prefix: &str,
        identifier: &str,
        offset: u32,
    ) -> Result<Arc<CallableDescriptor>, ParseError> {
        let mut namespace_known = false;
        for namespace in self.session.namespaces.resolve(prefix) {
            match self.session.resolver.resolve(namespace, identifier) {
                Resolution::Resolved(descriptor) => {
                    trace!(prefix, namespace, identifier, "resolved");
                    return Ok(descriptor);
                }
                Resolution::UnknownIdentifier => namespace_known = true,
                Resolution::UnknownNamespace => {}
            }
        }
        let kind = if namespace_known {
            ParseErrorKind::UnknownIdentifier {
                namespace: prefix.to_owned(),
                identifier: identifier.to_owned(),
            }
        } else {
            ParseErrorKind::UnknownNamespace {
                namespace: prefix.to_owned(),
            }
        };
        Err(self.error(kind, offset))
    }

    /// Resolve and validate a call, apply its capabilities and run the
    /// `CallOpened` interceptors.
    fn open_call(
        &mut self,
        prefix: &str,
        identifier: &str,
        arguments: ArrayNode,
        offset: u32,
    ) -> Result<Node, ParseError> {
        let descriptor = self.resolve(prefix, identifier, offset)?;
        let mut call = CallNode::new(prefix, identifier, descriptor);
        for (key, value) in arguments.into_entries() {
            match key {
                ArrayKey::Name(name) => {
                    call.arguments.insert(name, value);
                }
                ArrayKey::Index(index) => {
                    let detail = format!(
                        "positional value at index {index} in arguments of {}",
                        call.qualified_name()
                    );
                    return Err(self.error(ParseErrorKind::malformed_arguments(detail), offset));
                }
            }
        }
        if self.session.config.strict_arguments {
            self.validate_arguments(&call, offset)?;
        }
        self.apply_capabilities(&call);
        debug!(
            call = %call.qualified_name(),
            arguments = call.arguments.len(),
            offset,
            "call opened"
        );
        Ok(self.intercept(Node::Call(Box::new(call)), InterceptionPoint::CallOpened))
    }

    fn validate_arguments(&self, call: &CallNode, offset: u32) -> Result<(), ParseError> {
        let descriptor = &call.descriptor;
        if !descriptor.has(Capabilities::ARBITRARY_ARGUMENTS) {
            if let Some(name) = call
                .arguments
                .keys()
                .find(|name| descriptor.argument_definition(name).is_none())
            {
                let kind = ParseErrorKind::UndeclaredArgument {
                    call: call.qualified_name(),
                    argument: name.clone(),
                };
                return Err(self.error(kind, offset));
            }
        }
        if let Some(missing) = descriptor
            .required_arguments()
            .find(|definition| !call.arguments.contains_key(&definition.name))
        {
            let kind = ParseErrorKind::MissingRequiredArgument {
                call: call.qualified_name(),
                argument: missing.name.clone(),
            };
            return Err(self.error(kind, offset));
        }
        Ok(())
    }

    fn apply_capabilities(&mut self, call: &CallNode) {
        let capabilities = call.descriptor.capabilities();
        if capabilities.contains(Capabilities::LAYOUT) {
            if let Some(Value::String(name)) = call.argument("name") {
                self.state.set_layout_name(name.clone());
            }
        }
        if capabilities.contains(Capabilities::UNCACHEABLE) {
            self.state.mark_uncompilable();
        }
    }

    /// Value of an unquoted word: a number, or an object accessor.
    fn bare_value(&mut self, word: &str) -> Value {
        match literal::numeric(word) {
            Some(number) => number,
            None => Value::Node(self.accessor_node(word)),
        }
    }
}

#[cfg(test)]
mod tests;
