//! Low-level splitting primitives for Weft templates.
//!
//! This crate knows nothing about tags, calls or namespaces. It owns the
//! input bytes ([`Source`]), the per-region byte masks ([`ByteSet`],
//! [`Context`]), the scanning state with its context stack ([`Position`]),
//! and the lazy producer of interesting bytes ([`Splitter`]).
//!
//! The sequencer in `weft_lexer` drives a [`Splitter`] and decides which
//! context is active; everything here is mechanical.

mod byte_set;
mod context;
mod position;
mod source;
mod splitter;

pub use byte_set::ByteSet;
pub use context::{Context, ContextKind, Needles};
pub use position::{Frame, Position};
pub use source::Source;
pub use splitter::{RawSymbol, Splitter};
