//! Scanning state: byte index, last capture boundary, and the context stack.
//!
//! The active context is held outside the stack. Entering a region pushes
//! the active context (with the offset it was opened at) and installs the
//! new one; leaving pops it back. Leaving with an empty stack is a no-op,
//! so unbalanced closers in text never underflow.

use std::ops::Range;

use smallvec::SmallVec;

use crate::{Context, ContextKind};

/// A saved context and the byte offset of the symbol that opened it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub context: Context,
    pub opened_at: u32,
}

#[derive(Clone, Debug)]
pub struct Position {
    index: u32,
    last_yield: u32,
    context: Context,
    opened_at: u32,
    stack: SmallVec<[Frame; 16]>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Fresh state at byte 0 in the root context.
    pub fn new() -> Self {
        Self {
            index: 0,
            last_yield: 0,
            context: Context::ROOT,
            opened_at: 0,
            stack: SmallVec::new(),
        }
    }

    /// Next byte the splitter will examine.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// Start of the text not yet attached to any emitted token.
    #[inline]
    pub fn last_yield(&self) -> u32 {
        self.last_yield
    }

    /// Close the pending capture at `symbol_at`.
    ///
    /// Returns the span `last_yield..symbol_at` and moves `last_yield` to
    /// the current index, which sits just past the symbol.
    pub fn capture(&mut self, symbol_at: u32) -> Range<u32> {
        let start = self.last_yield.min(symbol_at);
        self.last_yield = self.index.max(symbol_at);
        start..symbol_at
    }

    /// Drop everything between `last_yield` and the current index from
    /// future captures.
    pub fn discard_pending(&mut self) {
        self.last_yield = self.index;
    }

    #[inline]
    pub fn context(&self) -> Context {
        self.context
    }

    /// Offset of the symbol that opened the active context.
    pub fn opened_at(&self) -> u32 {
        self.opened_at
    }

    /// Push the active context and make `context` active.
    pub fn enter(&mut self, context: Context, opened_at: u32) {
        self.stack.push(Frame {
            context: self.context,
            opened_at: self.opened_at,
        });
        self.context = context;
        self.opened_at = opened_at;
    }

    /// Pop back to the enclosing context.
    ///
    /// Returns the context that was left, or `None` when already at the
    /// bottom of the stack.
    pub fn leave(&mut self) -> Option<Context> {
        let frame = self.stack.pop()?;
        let left = self.context;
        self.context = frame.context;
        self.opened_at = frame.opened_at;
        Some(left)
    }

    /// Replace the active context without touching the stack.
    pub fn switch(&mut self, context: Context) {
        self.context = context;
    }

    /// Number of saved contexts; zero means the root is active.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The first region entered that is still open.
    pub fn outermost_unclosed(&self) -> Option<Frame> {
        match self.stack.len() {
            0 => None,
            1 => Some(Frame {
                context: self.context,
                opened_at: self.opened_at,
            }),
            _ => self.stack.get(1).copied(),
        }
    }

    /// Kinds on the stack from the bottom up, followed by the active one.
    pub fn kinds(&self) -> impl Iterator<Item = ContextKind> + '_ {
        self.stack
            .iter()
            .map(|frame| frame.context.kind())
            .chain(std::iter::once(self.context.kind()))
    }
}
