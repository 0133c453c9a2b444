//! Pattern-matched inline expressions.
//!
//! An inline without a call (`{a + b}`, `{x ? y : z}`, `{count}`) is offered
//! to each recognizer in order before falling back to an accessor or text.
//! The first pattern that matches builds the node.

use std::fmt;

use regex::{Captures, Regex};
use weft_ir::{ExpressionNode, Node};

/// Builds a node from the inline text and the pattern's captures.
pub type ExpressionFactory = Box<dyn Fn(&str, &Captures<'_>) -> Node + Send + Sync>;

pub struct ExpressionRecognizer {
    name: String,
    pattern: Regex,
    factory: ExpressionFactory,
}

impl ExpressionRecognizer {
    pub fn new<F>(name: impl Into<String>, pattern: Regex, factory: F) -> Self
    where
        F: Fn(&str, &Captures<'_>) -> Node + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            pattern,
            factory: Box::new(factory),
        }
    }

    /// A recognizer producing [`Node::Expression`] with every capture group.
    pub fn capturing(name: impl Into<String>, pattern: Regex) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::new(name, pattern, move |source, captures| {
            Node::Expression(ExpressionNode {
                name: label.clone(),
                source: source.to_owned(),
                groups: captures
                    .iter()
                    .map(|group| group.map(|m| m.as_str().to_owned()))
                    .collect(),
            })
        })
    }

    /// Arithmetic between two operands: `{a + b}`, `{price * 2}`.
    pub fn math() -> Result<Self, regex::Error> {
        let pattern = Regex::new(r"^(\S+)\s*([+\-*/%^])\s*(\S+)$")?;
        Ok(Self::capturing("math", pattern))
    }

    /// Conditional choice: `{cond ? then : else}`.
    pub fn ternary() -> Result<Self, regex::Error> {
        let pattern = Regex::new(r"^(\S+)\s*\?\s*(\S*)\s*:\s*(\S+)$")?;
        Ok(Self::capturing("ternary", pattern))
    }

    /// Type cast: `{value as integer}`.
    pub fn cast() -> Result<Self, regex::Error> {
        let pattern = Regex::new(r"^(\S+)\s+as\s+(integer|float|boolean|string|array)$")?;
        Ok(Self::capturing("cast", pattern))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn recognize(&self, expression: &str) -> Option<Node> {
        let captures = self.pattern.captures(expression)?;
        Some((self.factory)(expression, &captures))
    }
}

impl fmt::Debug for ExpressionRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionRecognizer")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// First recognizer that matches `expression`.
pub(crate) fn recognize(recognizers: &[ExpressionRecognizer], expression: &str) -> Option<Node> {
    recognizers
        .iter()
        .find_map(|recognizer| recognizer.recognize(expression))
}

#[cfg(test)]
mod tests;
