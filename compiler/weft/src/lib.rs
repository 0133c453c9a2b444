//! Weft: a parser front end for Fluid-style templates.
//!
//! ```text
//! template text
//!     │  strip_namespace_declarations
//!     ▼
//! Splitter ──► Sequencer ──► tree builder ──► ParsedTemplate
//!  (bytes)     (tokens)      (resolver, interceptors, recognizers)
//! ```
//!
//! [`TemplateParser`] owns everything a parse reads: the namespace table,
//! the [`Resolver`], interceptors, expression recognizers and the
//! [`ParserConfig`]. It is `Send + Sync`, so one parser can serve many
//! threads; each call to [`TemplateParser::parse`] is independent.

use std::io::Write;
use std::sync::Once;

use weft_parse::ParseSession;

pub use weft_diagnostic::{ColorMode, Diagnostic, DiagnosticEmitter, TerminalEmitter};
pub use weft_ir::{
    ArgumentDefinition, ArgumentType, ArrayKey, ArrayNode, CallNode, CallableDescriptor,
    Capabilities, ExpressionNode, NamespaceTable, Node, Value,
};
pub use weft_lexer::{ContextKind, LexErrorKind};
pub use weft_parse::{
    strip_namespace_declarations, ExpressionFactory, ExpressionRecognizer, InterceptionPoint,
    InterceptionPoints, Interceptor, ParseError, ParseErrorKind, ParsedTemplate, ParserConfig,
    ParsingState, Registry, Resolution, Resolver,
};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

pub struct TemplateParser {
    namespaces: NamespaceTable,
    resolver: Box<dyn Resolver>,
    interceptors: Vec<Box<dyn Interceptor>>,
    recognizers: Vec<ExpressionRecognizer>,
    config: ParserConfig,
}

impl TemplateParser {
    pub fn new(resolver: impl Resolver + 'static) -> Self {
        TemplateParser {
            namespaces: NamespaceTable::new(),
            resolver: Box::new(resolver),
            interceptors: Vec::new(),
            recognizers: Vec::new(),
            config: ParserConfig::default(),
        }
    }

    /// Bind `prefix` to a namespace identifier for every template.
    ///
    /// Declarations inside a template are added on top of these for that
    /// template only.
    #[must_use]
    pub fn with_namespace(
        mut self,
        prefix: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        self.namespaces.declare(prefix, identifier);
        self
    }

    #[must_use]
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Recognizers are tried in the order they were added.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: ExpressionRecognizer) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Parse one template.
    ///
    /// `{namespace ...}` declarations are removed before sequencing, with
    /// their newlines kept, so error lines match the original text.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn parse(&self, source: &str) -> Result<ParsedTemplate, ParseError> {
        let mut namespaces = self.namespaces.clone();
        let source = strip_namespace_declarations(source, &mut namespaces);
        let session = ParseSession::new(&namespaces, self.resolver.as_ref())
            .with_interceptors(&self.interceptors)
            .with_recognizers(&self.recognizers)
            .with_config(self.config);
        weft_parse::parse(&source, &session)
    }
}

/// Render `error` through `emitter` and flush it.
pub fn report<W: Write>(error: &ParseError, emitter: &mut TerminalEmitter<W>) {
    emitter.emit(&error.to_diagnostic());
    emitter.flush();
}
