//! One-line source excerpt with a caret under the failing byte.

use std::fmt;

use crate::LineOffsetTable;

/// Where an error happened, with enough of the source to show it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceExcerpt {
    /// 0-based byte offset into the source.
    pub offset: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    /// The full text of the line, without its terminator.
    pub line_text: String,
}

impl SourceExcerpt {
    pub fn locate(source: &str, offset: u32) -> Self {
        Self::locate_with(&LineOffsetTable::build(source), source, offset)
    }

    /// Like [`locate`](Self::locate) with a table built once for `source`.
    pub fn locate_with(table: &LineOffsetTable, source: &str, offset: u32) -> Self {
        let (line, column) = table.offset_to_line_col(source, offset);
        let line_text = table.line_text(source, line).unwrap_or("").to_owned();
        Self {
            offset,
            line,
            column,
            line_text,
        }
    }

    /// Whitespace up to the column followed by `^`. Tabs in the line are
    /// kept so the caret lines up under any tab width.
    pub fn caret(&self) -> String {
        let mut caret: String = self
            .line_text
            .chars()
            .take(self.column.saturating_sub(1) as usize)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        caret.push('^');
        caret
    }

    fn gutter_width(&self) -> usize {
        self.line.to_string().len()
    }
}

impl fmt::Display for SourceExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = " ".repeat(self.gutter_width());
        writeln!(f, "{pad}--> line {}, column {}", self.line, self.column)?;
        writeln!(f, "{pad} |")?;
        writeln!(f, "{} | {}", self.line, self.line_text)?;
        write!(f, "{pad} | {}", self.caret())
    }
}
