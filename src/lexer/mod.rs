//! Lexical analysis for pseudocode highlighting.
//!
//! This module classifies pseudocode source into highlighting categories
//! ([`TokenKind`]). It handles:
//!
//! - Case-insensitive keyword and boolean recognition
//! - Numbers with optional sign and fraction
//! - Escape-aware single- and double-quoted strings
//! - `//` line comments and operator runs
//! - Identifiers, with malformed ones tagged [`TokenKind::Invalid`]
//!
//! ## Example
//!
//! ```
//! use pseudocode::lexer::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("IF x > 0 THEN").collect();
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! assert_eq!(tokens[2].kind, TokenKind::Operator);
//! ```
//!
//! ## Design Notes
//!
//! Editors drive highlighting one token at a time from a cursor, so the
//! primitive here is [`scan`]: given a source and a byte offset it consumes
//! exactly one [`Segment`]. Text that no rule classifies (whitespace,
//! punctuation, a stray quote) is returned as a one-character plain
//! segment, which guarantees progress and full coverage of the input.
//! [`Lexer`] builds on `scan` and yields only classified tokens.

mod identifier;
mod token;

pub use identifier::is_valid_identifier;
pub use token::{Token, TokenKind};

use logos::Logos;
use std::ops::Range;
use token::RawToken;

/// One step of the tokenizer: a span and its classification, if any.
///
/// `kind` is `None` for plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Byte offsets of the consumed text
    pub span: Range<usize>,
    /// Highlighting category, or `None` for unclassified text
    pub kind: Option<TokenKind>,
}

/// Consumes one segment of `source` starting at byte offset `cursor`.
///
/// Returns `None` at end of input, or when `cursor` is not on a character
/// boundary of `source`.
///
/// # Example
///
/// ```
/// use pseudocode::lexer::{scan, TokenKind};
///
/// let seg = scan("x <= 10", 2).unwrap();
/// assert_eq!(seg.span, 2..4);
/// assert_eq!(seg.kind, Some(TokenKind::Operator));
///
/// // Whitespace is plain text, one character at a time
/// let seg = scan("x <= 10", 1).unwrap();
/// assert_eq!(seg.span, 1..2);
/// assert_eq!(seg.kind, None);
/// ```
pub fn scan(source: &str, cursor: usize) -> Option<Segment> {
    let rest = source.get(cursor..)?;
    let first = rest.chars().next()?;

    let mut inner = RawToken::lexer(rest);
    match inner.next() {
        Some(Ok(raw)) => {
            let local = inner.span();
            let kind = match raw {
                RawToken::Keyword => TokenKind::Keyword,
                RawToken::Boolean => TokenKind::Boolean,
                RawToken::Number => TokenKind::Number,
                RawToken::String => TokenKind::String,
                RawToken::Comment => TokenKind::Comment,
                RawToken::Operator => TokenKind::Operator,
                RawToken::Word if is_valid_identifier(inner.slice()) => TokenKind::Identifier,
                RawToken::Word => TokenKind::Invalid,
            };
            Some(Segment {
                span: cursor + local.start..cursor + local.end,
                kind: Some(kind),
            })
        }
        // No rule applies here: consume a single character as plain text
        _ => Some(Segment {
            span: cursor..cursor + first.len_utf8(),
            kind: None,
        }),
    }
}

/// Iterator over every segment of a source, plain text included.
///
/// Consecutive segments are contiguous and together cover the whole
/// input.
#[derive(Debug, Clone)]
pub struct Segments<'source> {
    source: &'source str,
    cursor: usize,
}

impl<'source> Iterator for Segments<'source> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = scan(self.source, self.cursor)?;
        self.cursor = segment.span.end;
        Some(segment)
    }
}

/// Iterates every segment of `source`, including plain text.
pub fn segments(source: &str) -> Segments<'_> {
    Segments { source, cursor: 0 }
}

/// The tokenizer for pseudocode source.
///
/// Yields classified [`Token`]s in source order; unclassified text is
/// skipped.
///
/// ## Example
///
/// ```
/// use pseudocode::lexer::{Lexer, TokenKind};
///
/// let tokens: Vec<_> = Lexer::new("RETURN 42").collect();
///
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].kind, TokenKind::Keyword);
/// assert_eq!(tokens[1].kind, TokenKind::Number);
/// assert_eq!(tokens[1].text, "42");
/// ```
pub struct Lexer<'source> {
    /// The underlying segment stream
    inner: Segments<'source>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: segments(source),
        }
    }

    /// Create a lexer that starts at byte offset `cursor`.
    ///
    /// Useful for re-highlighting from the start of an edited line.
    pub fn starting_at(source: &'source str, cursor: usize) -> Self {
        Self {
            inner: Segments { source, cursor },
        }
    }

    /// Get the original source code.
    pub fn source(&self) -> &'source str {
        self.inner.source
    }

    /// Get the next classified token, if any.
    ///
    /// Returns `None` when the end of input is reached.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let segment = self.inner.next()?;
            if let Some(kind) = segment.kind {
                let text = &self.inner.source[segment.span.clone()];
                return Some(Token::new(kind, segment.span, text));
            }
        }
    }

    /// Collect all remaining tokens into a vector.
    pub fn collect_tokens(self) -> Vec<Token> {
        self.collect()
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Convenience function to lex source code directly.
///
/// # Example
///
/// ```
/// use pseudocode::lexer::{lex, TokenKind};
///
/// let tokens = lex("PRINT TRUE");
/// assert_eq!(tokens[1].kind, TokenKind::Boolean);
/// ```
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect_tokens()
}

/// Returns the classified token covering byte offset `offset`, if any.
pub fn token_at(source: &str, offset: usize) -> Option<Token> {
    // Tokens never cross a line break, so start at the line
    let line_start = source
        .get(..offset)?
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    Lexer::starting_at(source, line_start)
        .take_while(|t| t.span.start <= offset)
        .find(|t| t.span.contains(&offset))
}
