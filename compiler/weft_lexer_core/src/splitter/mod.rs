//! Lazy producer of interesting bytes.
//!
//! Each call scans forward from the current index with the active
//! context's mask and yields the first member byte with its offset. When
//! the scan reaches the sentinel it yields exactly one [`RawSymbol::End`]
//! and then nothing.
//!
//! The splitter never moves `last_yield`; capturing the text between
//! symbols is the sequencer's job. Contexts with at most three interesting
//! bytes are scanned with memchr, the rest with a mask lookup per byte.

use std::iter::FusedIterator;

use crate::{ByteSet, Context, Position, Source};

/// One interesting byte, or the end of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawSymbol {
    Byte { byte: u8, offset: u32 },
    End { offset: u32 },
}

impl RawSymbol {
    pub fn offset(self) -> u32 {
        match self {
            RawSymbol::Byte { offset, .. } | RawSymbol::End { offset } => offset,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Splitter<'src> {
    source: Source<'src>,
    position: Position,
    finished: bool,
}

impl<'src> Splitter<'src> {
    pub fn new(source: Source<'src>) -> Self {
        Self {
            source,
            position: Position::new(),
            finished: false,
        }
    }

    pub fn source(&self) -> &Source<'src> {
        &self.source
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// Active context.
    pub fn context(&self) -> Context {
        self.position.context()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Yield the next interesting byte under the active context.
    pub fn next_symbol(&mut self) -> Option<RawSymbol> {
        if self.finished {
            return None;
        }
        let len = self.source.len();
        let start = self.position.index();
        let found = if start < len {
            self.find_interesting(start, self.position.context())
        } else {
            None
        };
        match found {
            Some(offset) => {
                self.position.set_index(offset + 1);
                Some(RawSymbol::Byte {
                    byte: self.source.byte_at(offset),
                    offset,
                })
            }
            None => {
                self.finished = true;
                self.position.set_index(len);
                Some(RawSymbol::End { offset: len })
            }
        }
    }

    /// Step over `count` bytes without examining them.
    pub fn skip_bytes(&mut self, count: u32) {
        let target = self.position.index().saturating_add(count);
        self.skip_to(target);
    }

    /// Move the index forward to `offset`, clamped to the end of input.
    pub fn skip_to(&mut self, offset: u32) {
        let target = offset.min(self.source.len()).max(self.position.index());
        self.position.set_index(target);
    }

    /// Step over a run of bytes in `set`, returning how many were skipped.
    pub fn skip_run(&mut self, set: ByteSet) -> u32 {
        let start = self.position.index();
        let bytes = &self.source.as_sentinel_bytes()[start as usize..];
        // The sentinel is never a member, so the run stops at end of input.
        let run = bytes.iter().take_while(|&&b| set.contains(b)).count() as u32;
        let end = start.saturating_add(run).min(self.source.len());
        self.position.set_index(end);
        end - start
    }

    fn find_interesting(&self, start: u32, context: Context) -> Option<u32> {
        let haystack = &self.source.as_bytes()[start as usize..];
        let hit = match context.needles() {
            Some(needles) => needles.find(haystack),
            None => {
                let mask = context.mask();
                haystack.iter().position(|&b| mask.contains(b))
            }
        };
        hit.map(|i| start + i as u32)
    }
}

impl Iterator for Splitter<'_> {
    type Item = RawSymbol;

    fn next(&mut self) -> Option<RawSymbol> {
        self.next_symbol()
    }
}

impl FusedIterator for Splitter<'_> {}
