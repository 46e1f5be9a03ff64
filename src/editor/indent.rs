//! Auto-indent on line break.
//!
//! One fixed rule: when the text before the cursor ends with the word `DO`,
//! the new line is indented one unit deeper than the current one. Every
//! other line break is left to the editor's default handling.

use serde::Serialize;

/// The block-entry marker that triggers indentation. Case-sensitive.
pub const BLOCK_ENTRY_MARKER: &str = "DO";

/// Text to insert in place of a plain line break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndentEdit {
    /// Byte offset where `insert` goes (the cursor position)
    pub offset: usize,
    /// Line break followed by the new indentation
    pub insert: String,
    /// Cursor position after the edit is applied
    pub cursor: usize,
}

impl IndentEdit {
    /// Applies the edit to `document`, returning the new text.
    ///
    /// Returns `None` if `offset` lies past the end of `document` or not
    /// on a character boundary, as happens when the edit was computed for
    /// a different text.
    pub fn apply(&self, document: &str) -> Option<String> {
        let head = document.get(..self.offset)?;
        let tail = document.get(self.offset..)?;
        let mut out = String::with_capacity(document.len() + self.insert.len());
        out.push_str(head);
        out.push_str(&self.insert);
        out.push_str(tail);
        Some(out)
    }
}

/// Decides how to handle a line break typed at byte offset `cursor`.
///
/// Returns `None` to decline, in which case the editor inserts a plain
/// line break. `indent_unit` is appended to the current line's leading
/// whitespace.
///
/// # Example
///
/// ```
/// use pseudocode::editor::auto_indent;
///
/// let doc = "FOR i = 1 TO 10 DO";
/// let edit = auto_indent(doc, doc.len(), "    ").unwrap();
/// assert_eq!(edit.insert, "\n    ");
/// assert_eq!(edit.cursor, doc.len() + 5);
/// ```
pub fn auto_indent(document: &str, cursor: usize, indent_unit: &str) -> Option<IndentEdit> {
    let before = document.get(..cursor)?;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &before[line_start..];

    if !ends_with_marker(line.trim_end()) {
        return None;
    }

    let base_indent = &line[..line.len() - line.trim_start().len()];
    let insert = format!("\n{base_indent}{indent_unit}");
    let cursor_after = cursor + insert.len();

    Some(IndentEdit {
        offset: cursor,
        insert,
        cursor: cursor_after,
    })
}

/// True if `text` ends with the marker as a whole word.
fn ends_with_marker(text: &str) -> bool {
    match text.strip_suffix(BLOCK_ENTRY_MARKER) {
        Some(head) => !head
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}
