//! Block-structure matching for code folding.
//!
//! A line opens a block when its leading word is one of the opener
//! keywords, and the block closes at a later line that starts with a
//! closer keyword. The foldable region runs from the end of the opening line to the
//! end of the closing line.
//!
//! ```text
//! FOR i = 1 TO 10      <- opener; fold starts at end of this line
//!   x = x + 1
//! NEXT                 <- closer; fold ends at end of this line
//! ```
//!
//! Two strategies are supported (see [`FoldStrategy`]). An opener with no
//! closer produces no range at all.

use serde::{Deserialize, Serialize};

/// Keywords that open a foldable block.
pub const BLOCK_OPENERS: &[&str] = &[
    "FUNCTION",
    "PROCEDURE",
    "FOR",
    "WHILE",
    "REPEAT",
    "IF",
    "BEGIN",
];

/// Keywords that close a foldable block.
///
/// These match as line prefixes, so `ENDWHILE`, `END_IF` and `ENDLOOP` all
/// close a block; see [`is_block_closer`].
pub const BLOCK_CLOSERS: &[&str] = &["END", "ENDIF", "NEXT", "UNTIL"];

/// A foldable region of the document, in byte offsets.
///
/// `from` is the end of the opening line and `to` the end of the closing
/// line (excluding its line break). Always `to > from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    pub from: usize,
    pub to: usize,
}

/// How an opener is paired with its closer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldStrategy {
    /// Count nesting: every opener increments depth, every closer
    /// decrements it, and the block ends when depth returns to zero.
    #[default]
    Nested,
    /// Pair the opener with the first closer after it, ignoring nesting.
    /// Nested blocks fold to the inner closer.
    FirstCloser,
}

/// Returns the leading word of a line, ignoring indentation.
fn leading_word(line: &str) -> &str {
    let trimmed = line.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

fn is_one_of(word: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Returns true if the line begins with a block-opening keyword.
pub fn is_block_opener(line: &str) -> bool {
    is_one_of(leading_word(line), BLOCK_OPENERS)
}

/// Returns true if the line begins with a block-closing keyword.
///
/// The keyword need not stand alone: any line whose trimmed text starts
/// with `END`, `NEXT` or `UNTIL` (in any case) is a closer.
pub fn is_block_closer(line: &str) -> bool {
    let trimmed = line.trim_start().as_bytes();
    BLOCK_CLOSERS.iter().any(|k| {
        trimmed
            .get(..k.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(k.as_bytes()))
    })
}

/// Finds the fold range for the line spanning `line_start..line_end`.
///
/// `line_end` is the offset of the line's terminating `\n` (or the end of
/// the document). Returns `None` if the line is not a block opener, if the
/// offsets do not describe a slice of `document`, or if no matching closer
/// follows.
///
/// # Example
///
/// ```
/// use pseudocode::editor::{match_fold, FoldRange, FoldStrategy};
///
/// let doc = "FOR i = 1 TO 10\n  x = x + 1\nNEXT\n";
/// let range = match_fold(doc, 0, 15, FoldStrategy::Nested);
/// assert_eq!(range, Some(FoldRange { from: 15, to: 32 }));
/// ```
pub fn match_fold(
    document: &str,
    line_start: usize,
    line_end: usize,
    strategy: FoldStrategy,
) -> Option<FoldRange> {
    let line = document.get(line_start..line_end)?;
    if !is_block_opener(line) {
        return None;
    }

    let mut depth = 1usize;
    let rest = document.get(line_end..)?;
    let mut lines = rest.split('\n');
    // Whatever follows `line_end` on the opening line itself
    let mut next_start = line_end + lines.next()?.len() + 1;

    for text in lines {
        let start = next_start;
        next_start = start + text.len() + 1;

        let text = text.strip_suffix('\r').unwrap_or(text);
        let closing_end = start + text.len();

        match strategy {
            FoldStrategy::FirstCloser => {
                if is_block_closer(text) {
                    return fold_range(line_end, closing_end);
                }
            }
            FoldStrategy::Nested => {
                if is_block_closer(text) {
                    depth -= 1;
                    if depth == 0 {
                        return fold_range(line_end, closing_end);
                    }
                } else if is_block_opener(text) {
                    depth += 1;
                }
            }
        }
    }

    log::trace!("unterminated block at offset {line_start}");
    None
}

fn fold_range(from: usize, to: usize) -> Option<FoldRange> {
    (to > from).then_some(FoldRange { from, to })
}

/// Computes fold ranges for every opening line in `document`.
///
/// Ranges are returned in document order of their opening lines.
pub fn fold_ranges(document: &str, strategy: FoldStrategy) -> Vec<FoldRange> {
    let mut ranges = Vec::new();
    let mut line_start = 0;
    for line in document.split('\n') {
        let line_end = line_start + line.len();
        let content_end = line_start + line.strip_suffix('\r').unwrap_or(line).len();
        if let Some(range) = match_fold(document, line_start, content_end, strategy) {
            ranges.push(range);
        }
        line_start = line_end + 1;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Byte offset of the end of the (0-based) `n`th line.
    fn line_end(doc: &str, n: usize) -> usize {
        doc.split('\n').take(n + 1).map(|l| l.len() + 1).sum::<usize>() - 1
    }

    #[test]
    fn test_for_next_block() {
        let doc = "FOR i = 1 TO 10\n  x = x + 1\nNEXT\n";
        let range = match_fold(doc, 0, line_end(doc, 0), FoldStrategy::Nested).unwrap();
        assert_eq!(range.from, line_end(doc, 0));
        assert_eq!(range.to, line_end(doc, 2));
        assert_eq!(fold_ranges(doc, FoldStrategy::Nested), vec![range]);
    }

    #[test]
    fn test_unterminated_block_has_no_range() {
        let doc = "IF x > 0\n  y = 1\n";
        assert_eq!(match_fold(doc, 0, line_end(doc, 0), FoldStrategy::Nested), None);
        assert_eq!(match_fold(doc, 0, line_end(doc, 0), FoldStrategy::FirstCloser), None);
        assert!(fold_ranges(doc, FoldStrategy::Nested).is_empty());
    }

    #[test]
    fn test_nested_same_keyword_depth_counted() {
        let doc = "IF a\nIF b\nENDIF\nENDIF\n";
        let outer = match_fold(doc, 0, line_end(doc, 0), FoldStrategy::Nested).unwrap();
        assert_eq!(outer.to, line_end(doc, 3));

        let inner_start = line_end(doc, 0) + 1;
        let inner =
            match_fold(doc, inner_start, line_end(doc, 1), FoldStrategy::Nested).unwrap();
        assert_eq!(inner.to, line_end(doc, 2));
    }

    #[test]
    fn test_nested_same_keyword_first_closer() {
        let doc = "IF a\nIF b\nENDIF\nENDIF\n";
        let outer = match_fold(doc, 0, line_end(doc, 0), FoldStrategy::FirstCloser).unwrap();
        assert_eq!(outer.to, line_end(doc, 2));
    }

    #[test]
    fn test_case_insensitive_and_indented() {
        let doc = "  while x < 10 do\n    x = x + 1\n  endwhile\n";
        let range = match_fold(doc, 0, line_end(doc, 0), FoldStrategy::Nested).unwrap();
        assert_eq!(range.to, line_end(doc, 2));
    }

    #[test]
    fn test_repeat_until() {
        let doc = "REPEAT\n  x = x - 1\nUNTIL x = 0";
        let range = match_fold(doc, 0, 6, FoldStrategy::Nested).unwrap();
        assert_eq!(range, FoldRange { from: 6, to: doc.len() });
    }

    #[test]
    fn test_end_if_two_words() {
        let doc = "IF x THEN\n  y = 1\nEND IF\n";
        assert!(match_fold(doc, 0, line_end(doc, 0), FoldStrategy::Nested).is_some());
    }

    #[test]
    fn test_non_opener_lines() {
        let doc = "x = 1\nFORMAT = 2\nNEXT\n";
        assert_eq!(match_fold(doc, 0, line_end(doc, 0), FoldStrategy::Nested), None);
        assert!(fold_ranges(doc, FoldStrategy::Nested).is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = "BEGIN\r\n  x = 1\r\nEND\r\n";
        let ranges = fold_ranges(doc, FoldStrategy::Nested);
        assert_eq!(ranges, vec![FoldRange { from: 5, to: 19 }]);
    }

    #[test]
    fn test_function_with_loops() {
        let doc = "FUNCTION f(n)\n  FOR i = 1 TO n\n    PRINT i\n  NEXT\n  RETURN n\nEND\n";
        let ranges = fold_ranges(doc, FoldStrategy::Nested);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].to, line_end(doc, 5));
        assert_eq!(ranges[1].to, line_end(doc, 3));
    }

    #[test]
    fn test_out_of_bounds_offsets() {
        assert_eq!(match_fold("IF x", 0, 99, FoldStrategy::Nested), None);
    }

    #[test]
    fn test_closer_detection() {
        assert!(is_block_closer("ENDFOR"));
        assert!(is_block_closer("  next i"));
        assert!(is_block_closer("EndProc"));
        assert!(!is_block_closer("x = END"));
        assert!(!is_block_closer("NEX"));
        assert!(is_block_opener("procedure swap(a, b)"));
        assert!(!is_block_opener("IFFY = 1"));
    }

    #[test]
    fn test_prefixed_closers_close_blocks() {
        for closer in ["ENDLOOP", "END_IF", "ENDDO", "endproc"] {
            let doc = format!("WHILE x > 0\n  x = x - 1\n{closer}\n");
            for strategy in [FoldStrategy::Nested, FoldStrategy::FirstCloser] {
                let range = match_fold(&doc, 0, line_end(&doc, 0), strategy);
                assert_eq!(
                    range,
                    Some(FoldRange { from: line_end(&doc, 0), to: line_end(&doc, 2) }),
                    "{closer} under {strategy:?}"
                );
            }
        }
    }

    #[test]
    fn test_prefixed_closer_ends_nested_block() {
        let doc = "IF a THEN\n  WHILE b\n  ENDLOOP\nEND_IF\n";
        let ranges = fold_ranges(doc, FoldStrategy::Nested);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].to, line_end(doc, 3));
        assert_eq!(ranges[1].to, line_end(doc, 2));

        let legacy = fold_ranges(doc, FoldStrategy::FirstCloser);
        assert_eq!(legacy[0].to, line_end(doc, 2));
    }
}
