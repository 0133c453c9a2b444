//! Two-lane bit mask over the ASCII range.
//!
//! Bytes `0..=63` live in the primary lane, `64..=127` in the secondary
//! lane. Bytes above 127 are never members: every interesting byte in the
//! template grammar is ASCII, so multi-byte UTF-8 sequences always pass
//! through a split untouched.

/// Set of ASCII bytes stored as two 64-bit lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteSet {
    primary: u64,
    secondary: u64,
}

impl ByteSet {
    /// The set with no members.
    pub const EMPTY: Self = Self {
        primary: 0,
        secondary: 0,
    };

    /// Space, tab, carriage return and line feed.
    pub const WHITESPACE: Self = Self::from_bytes(b" \t\r\n");

    /// Build a set from a list of member bytes.
    pub const fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < bytes.len() {
            set = set.with(bytes[i]);
            i += 1;
        }
        set
    }

    /// Returns a copy of this set with `byte` added.
    ///
    /// Non-ASCII bytes are ignored.
    #[must_use]
    pub const fn with(self, byte: u8) -> Self {
        match byte {
            0..=63 => Self {
                primary: self.primary | (1u64 << byte),
                secondary: self.secondary,
            },
            64..=127 => Self {
                primary: self.primary,
                secondary: self.secondary | (1u64 << (byte - 64)),
            },
            _ => self,
        }
    }

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            primary: self.primary | other.primary,
            secondary: self.secondary | other.secondary,
        }
    }

    #[inline]
    pub const fn contains(self, byte: u8) -> bool {
        match byte {
            0..=63 => self.primary & (1u64 << byte) != 0,
            64..=127 => self.secondary & (1u64 << (byte - 64)) != 0,
            _ => false,
        }
    }

    /// Number of member bytes.
    pub const fn len(self) -> u32 {
        self.primary.count_ones() + self.secondary.count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.primary == 0 && self.secondary == 0
    }

    /// Raw lane for bytes `0..=63`.
    pub const fn primary(self) -> u64 {
        self.primary
    }

    /// Raw lane for bytes `64..=127`.
    pub const fn secondary(self) -> u64 {
        self.secondary
    }

    /// Member bytes in ascending order.
    pub fn members(self) -> impl Iterator<Item = u8> {
        (0u8..128).filter(move |&b| self.contains(b))
    }

    /// Strip leading and trailing member bytes from `text`.
    ///
    /// Members are ASCII, so the returned slice always falls on char
    /// boundaries.
    pub fn trim(self, text: &str) -> &str {
        let bytes = text.as_bytes();
        let Some(start) = bytes.iter().position(|&b| !self.contains(b)) else {
            return "";
        };
        let end = bytes
            .iter()
            .rposition(|&b| !self.contains(b))
            .map_or(start, |i| i + 1);
        text.get(start..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests;
