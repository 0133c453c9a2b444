//! Line and column lookup for byte offsets.
//!
//! [`LineOffsetTable`] pre-computes line starts once per source for
//! O(log L) lookups.

/// Pre-computed line offset table.
///
/// # Example
///
/// ```
/// use weft_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "line1\nline2\nline3";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 8), (2, 3));
/// assert_eq!(table.line_text(source, 3), Some("line3"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start. `offsets[0]` is always 0.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (line_idx as u32) + 1
    }

    /// 1-based (line, column). The column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.line_start_offset(line).unwrap_or(0) as usize;
        let end = floor_char_boundary(source, (offset as usize).min(source.len()));
        let prefix = source.get(line_start..end).unwrap_or("");
        let col = u32::try_from(prefix.chars().count()).unwrap_or(u32::MAX - 1) + 1;
        (line, col)
    }

    /// Byte offset of the start of a 1-based line.
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.offsets.get((line - 1) as usize).copied()
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let start = self.line_start_offset(line)? as usize;
        let end = self
            .line_start_offset(line + 1)
            .map_or(source.len(), |next| next as usize);
        let text = source.get(start..end)?;
        Some(text.trim_end_matches('\n').trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}
