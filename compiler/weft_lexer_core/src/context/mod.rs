//! Lexical contexts and their interesting-byte masks.
//!
//! A context decides which bytes the splitter stops at. Everything outside
//! the mask is swept into the next captured span.
//!
//! | Context       | Interesting bytes                          |
//! |---------------|--------------------------------------------|
//! | `Root`        | `{` `<`                                    |
//! | `Inline`      | `{ } ( ) : , \| > ' "` and whitespace      |
//! | `Tag`         | `:` `>` and whitespace                     |
//! | `InactiveTag` | `>` `{`                                    |
//! | `Array`       | `{ ( ) : , = > ' "` and whitespace         |
//! | `Quoted`      | `{ ' " \`                                  |

use std::fmt;

use crate::ByteSet;

/// Which region of the template a context describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContextKind {
    Root,
    Inline,
    Tag,
    InactiveTag,
    Array,
    Quoted,
}

impl ContextKind {
    /// Short lowercase name used in log fields and error context.
    pub const fn name(self) -> &'static str {
        match self {
            ContextKind::Root => "root",
            ContextKind::Inline => "inline",
            ContextKind::Tag => "tag",
            ContextKind::InactiveTag => "inactive tag",
            ContextKind::Array => "array",
            ContextKind::Quoted => "quoted",
        }
    }

    /// Name of the construct a context of this kind delimits.
    pub const fn region(self) -> &'static str {
        match self {
            ContextKind::Root => "template",
            ContextKind::Inline => "inline expression",
            ContextKind::Tag => "tag",
            ContextKind::InactiveTag => "HTML tag",
            ContextKind::Array => "argument list",
            ContextKind::Quoted => "quoted string",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Up to three needle bytes for the memchr fast path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Needles {
    One(u8),
    Two(u8, u8),
    Three(u8, u8, u8),
}

impl Needles {
    const fn of(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            1 => Some(Needles::One(bytes[0])),
            2 => Some(Needles::Two(bytes[0], bytes[1])),
            3 => Some(Needles::Three(bytes[0], bytes[1], bytes[2])),
            _ => None,
        }
    }

    /// Position of the first needle in `haystack`.
    #[inline]
    pub fn find(self, haystack: &[u8]) -> Option<usize> {
        match self {
            Needles::One(a) => memchr::memchr(a, haystack),
            Needles::Two(a, b) => memchr::memchr2(a, b, haystack),
            Needles::Three(a, b, c) => memchr::memchr3(a, b, c, haystack),
        }
    }
}

/// An immutable lexical context: its kind, its mask, and for quoted
/// contexts the quote byte that opened it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Context {
    kind: ContextKind,
    mask: ByteSet,
    needles: Option<Needles>,
    starting_byte: Option<u8>,
}

impl Context {
    pub const ROOT: Self = Self::new(ContextKind::Root, b"{<");
    pub const INLINE: Self = Self::new(ContextKind::Inline, b"{}():,|>'\" \t\r\n");
    pub const TAG: Self = Self::new(ContextKind::Tag, b":> \t\r\n");
    pub const INACTIVE_TAG: Self = Self::new(ContextKind::InactiveTag, b">{");
    pub const ARRAY: Self = Self::new(ContextKind::Array, b"{():,=>'\" \t\r\n");
    pub const QUOTED: Self = Self::new(ContextKind::Quoted, b"{'\"\\");

    const fn new(kind: ContextKind, interesting: &[u8]) -> Self {
        Self {
            kind,
            mask: ByteSet::from_bytes(interesting),
            needles: Needles::of(interesting),
            starting_byte: None,
        }
    }

    /// The quoted context opened by `quote`.
    pub const fn quoted(quote: u8) -> Self {
        Self {
            starting_byte: Some(quote),
            ..Self::QUOTED
        }
    }

    pub const fn kind(self) -> ContextKind {
        self.kind
    }

    pub const fn mask(self) -> ByteSet {
        self.mask
    }

    /// Needle bytes when the mask is small enough for memchr.
    pub const fn needles(self) -> Option<Needles> {
        self.needles
    }

    /// The quote byte that opened this context, if it is a quoted context.
    pub const fn starting_byte(self) -> Option<u8> {
        self.starting_byte
    }

    #[inline]
    pub const fn is_interesting(self, byte: u8) -> bool {
        self.mask.contains(byte)
    }
}
