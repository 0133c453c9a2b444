//! Parser configuration.

use weft_lexer::SequencerConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of simultaneously open regions (braces, tags,
    /// argument lists, quotes) and open tags.
    pub max_depth: usize,
    /// Bytes examined after `<` when looking for a namespace prefix.
    pub lookahead_limit: usize,
    /// Reject undeclared arguments and missing required ones.
    pub strict_arguments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: 128,
            lookahead_limit: 64,
            strict_arguments: true,
        }
    }
}

impl ParserConfig {
    pub fn sequencer(&self) -> SequencerConfig {
        SequencerConfig {
            max_depth: self.max_depth,
            lookahead_limit: self.lookahead_limit,
        }
    }
}
