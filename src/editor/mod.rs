//! Editor affordances built on the pseudocode language model.
//!
//! - [`fold`] - pairs block openers with closers for code folding
//! - [`indent`] - the auto-indent heuristic run on line break
//!
//! Both are pure functions of the document text and a position; the
//! editor owns rendering and applies the results. [`EditorConfig`] holds
//! the knobs they take.

mod fold;
mod indent;

pub use fold::{
    fold_ranges, is_block_closer, is_block_opener, match_fold, FoldRange, FoldStrategy,
    BLOCK_CLOSERS, BLOCK_OPENERS,
};
pub use indent::{auto_indent, IndentEdit, BLOCK_ENTRY_MARKER};

use serde::{Deserialize, Serialize};

/// Default indentation unit: four spaces.
pub const DEFAULT_INDENT_UNIT: &str = "    ";

/// Configuration for the editor affordances.
///
/// Deserializable so that it can arrive as LSP initialization options:
///
/// ```json
/// { "fold_strategy": "first_closer", "indent_unit": "  " }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// How block openers are paired with closers.
    pub fold_strategy: FoldStrategy,
    /// Indentation appended after a `DO` line.
    pub indent_unit: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fold_strategy: FoldStrategy::default(),
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
        }
    }
}

impl EditorConfig {
    /// Fold ranges for the whole document under this configuration.
    pub fn fold_ranges(&self, document: &str) -> Vec<FoldRange> {
        fold_ranges(document, self.fold_strategy)
    }

    /// Auto-indent decision under this configuration.
    pub fn auto_indent(&self, document: &str, cursor: usize) -> Option<IndentEdit> {
        auto_indent(document, cursor, &self.indent_unit)
    }
}
