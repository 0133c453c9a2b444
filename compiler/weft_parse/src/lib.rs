//! Tree builder for Weft templates.
//!
//! [`parse`] pulls tokens from a [`weft_lexer::Sequencer`] and builds a
//! [`Node::Root`](weft_ir::Node::Root). Calls are resolved through a
//! [`Resolver`] as they are met; unknown namespaces, callables and
//! arguments fail the parse. [`Interceptor`]s may replace nodes as they
//! are finalized, and [`ExpressionRecognizer`]s claim inline expressions
//! that are neither accessors nor calls.
//!
//! The first error ends the parse; there is no recovery and no partial
//! tree.

mod config;
mod error;
mod expression;
mod grammar;
mod interceptor;
mod preprocess;
mod resolver;
mod stack;
mod template;

use tracing::debug;
use weft_ir::NamespaceTable;

pub use config::ParserConfig;
pub use error::{ParseError, ParseErrorKind};
pub use expression::{ExpressionFactory, ExpressionRecognizer};
pub use interceptor::{InterceptionPoint, InterceptionPoints, Interceptor};
pub use preprocess::strip_namespace_declarations;
pub use resolver::{Registry, Resolution, Resolver};
pub use template::{ParsedTemplate, ParsingState};

/// Everything one parse reads but does not own.
pub struct ParseSession<'p> {
    namespaces: &'p NamespaceTable,
    resolver: &'p dyn Resolver,
    interceptors: &'p [Box<dyn Interceptor>],
    recognizers: &'p [ExpressionRecognizer],
    config: ParserConfig,
}

impl<'p> ParseSession<'p> {
    pub fn new(namespaces: &'p NamespaceTable, resolver: &'p dyn Resolver) -> Self {
        ParseSession {
            namespaces,
            resolver,
            interceptors: &[],
            recognizers: &[],
            config: ParserConfig::default(),
        }
    }

    #[must_use]
    pub fn with_interceptors(mut self, interceptors: &'p [Box<dyn Interceptor>]) -> Self {
        self.interceptors = interceptors;
        self
    }

    #[must_use]
    pub fn with_recognizers(mut self, recognizers: &'p [ExpressionRecognizer]) -> Self {
        self.recognizers = recognizers;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn namespaces(&self) -> &'p NamespaceTable {
        self.namespaces
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }
}

/// Parse `source` into a template tree.
///
/// `source` must already have its `{namespace ...}` declarations applied
/// (see [`strip_namespace_declarations`]).
///
/// # Errors
///
/// Returns the first [`ParseError`] met: an unterminated or mismatched
/// construct, an unresolvable call, an invalid argument list, or nesting
/// beyond [`ParserConfig::max_depth`].
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str, session: &ParseSession<'_>) -> Result<ParsedTemplate, ParseError> {
    let mut builder = grammar::TreeBuilder::new(source, session);
    let root = builder.sequence_root()?;
    let state = builder.into_state();
    debug!(
        layout = state.layout_name(),
        compilable = state.is_compilable(),
        "template parsed"
    );
    Ok(state.finish(root))
}
