//! The parsed template tree.
//!
//! A parse always produces a [`Node::Root`]. Text outside any construct
//! becomes [`Node::Text`]; `{a.b}` becomes [`Node::ObjectAccessor`];
//! `<ns:name>` tags and `{ns:name()}` calls become [`Node::Call`].

mod array;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::CallableDescriptor;

pub use array::{ArrayKey, ArrayNode, Value};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Ordered container; the top of every parse.
    Root(Vec<Node>),
    /// Literal text, already unescaped.
    Text(String),
    /// Dotted variable path such as `user.name`.
    ObjectAccessor(String),
    /// Literal array built from `{key: value}` or `(a, b)` syntax.
    Array(ArrayNode),
    /// Resolved call of a registered callable.
    Call(Box<CallNode>),
    /// Inline expression matched by an expression recognizer.
    Expression(ExpressionNode),
}

impl Node {
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(children)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn accessor(path: impl Into<String>) -> Self {
        Node::ObjectAccessor(path.into())
    }

    /// Name of the variant, for logs and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Root(_) => "root",
            Node::Text(_) => "text",
            Node::ObjectAccessor(_) => "object accessor",
            Node::Array(_) => "array",
            Node::Call(_) => "call",
            Node::Expression(_) => "expression",
        }
    }

    /// Child nodes of a root or call; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root(children) => children,
            Node::Call(call) => &call.children,
            _ => &[],
        }
    }

    /// Append a child node.
    ///
    /// Roots and calls take the child directly. Any other node is first
    /// wrapped in a root together with the new child.
    pub fn append(&mut self, child: Node) {
        match self {
            Node::Root(children) => children.push(child),
            Node::Call(call) => call.children.push(child),
            other => {
                let previous = std::mem::replace(other, Node::Root(Vec::with_capacity(2)));
                if let Node::Root(children) = other {
                    children.push(previous);
                    children.push(child);
                }
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_accessor(&self) -> Option<&str> {
        match self {
            Node::ObjectAccessor(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallNode> {
        match self {
            Node::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionNode> {
        match self {
            Node::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    /// Depth-first visit of this node and all descendants, including nodes
    /// held in argument and array values.
    pub fn walk(&self, visit: &mut dyn FnMut(&Node)) {
        visit(self);
        match self {
            Node::Root(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
            Node::Call(call) => {
                for value in call.arguments.values() {
                    value.walk(visit);
                }
                for child in &call.children {
                    child.walk(visit);
                }
            }
            Node::Array(array) => {
                for (_, value) in array.iter() {
                    value.walk(visit);
                }
            }
            Node::Text(_) | Node::ObjectAccessor(_) | Node::Expression(_) => {}
        }
    }
}

/// A resolved call with its arguments and body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CallNode {
    /// Namespace prefix as written in the template.
    pub namespace: String,
    pub identifier: String,
    pub arguments: IndexMap<String, Value>,
    pub children: Vec<Node>,
    pub descriptor: Arc<CallableDescriptor>,
}

impl CallNode {
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        descriptor: Arc<CallableDescriptor>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            arguments: IndexMap::new(),
            children: Vec::new(),
            descriptor,
        }
    }

    /// `prefix:identifier` as written in the template.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.identifier)
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

/// Result of an expression recognizer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionNode {
    /// Name of the recognizer that matched.
    pub name: String,
    /// Inline text between the braces, trimmed.
    pub source: String,
    /// Capture groups; index 0 is the whole match.
    pub groups: Vec<Option<String>>,
}
