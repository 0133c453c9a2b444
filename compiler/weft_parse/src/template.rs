//! Parse state visible to interceptors, and the finished template.

use weft_ir::{NamespaceTable, Node};

/// Mutable metadata threaded through one parse.
#[derive(Debug)]
pub struct ParsingState<'p> {
    namespaces: &'p NamespaceTable,
    depth: usize,
    layout_name: Option<String>,
    compilable: bool,
}

impl<'p> ParsingState<'p> {
    pub fn new(namespaces: &'p NamespaceTable) -> Self {
        Self {
            namespaces,
            depth: 0,
            layout_name: None,
            compilable: true,
        }
    }

    pub fn namespaces(&self) -> &'p NamespaceTable {
        self.namespaces
    }

    /// Number of tags currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn layout_name(&self) -> Option<&str> {
        self.layout_name.as_deref()
    }

    pub fn set_layout_name(&mut self, name: impl Into<String>) {
        self.layout_name = Some(name.into());
    }

    pub fn is_compilable(&self) -> bool {
        self.compilable
    }

    /// Mark the template as unsuitable for caching.
    pub fn mark_uncompilable(&mut self) {
        self.compilable = false;
    }

    pub(crate) fn finish(self, root: Node) -> ParsedTemplate {
        ParsedTemplate {
            root,
            layout_name: self.layout_name,
            compilable: self.compilable,
        }
    }
}

/// Output of a successful parse.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTemplate {
    root: Node,
    layout_name: Option<String>,
    compilable: bool,
}

impl ParsedTemplate {
    /// Always a [`Node::Root`].
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn layout_name(&self) -> Option<&str> {
        self.layout_name.as_deref()
    }

    pub fn is_compilable(&self) -> bool {
        self.compilable
    }
}
